//! Registration and login routes

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use social_auth::{hash_password, verify_password};
use social_db::{NewUser, User};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, RegisterRequest, TokenPayload, UserResponse};
use super::validation::{
    MIN_FIELD_LENGTH, validate_email, validate_min_length, validate_password, validate_username,
};

/// Validate, hash and store a new account
///
/// Shared by `POST /register` and `POST /users`.
pub(super) async fn create_account(
    state: &AppState,
    request: RegisterRequest,
) -> Result<User, ApiError> {
    validate_username(&request.username)?;
    validate_password(&request.password, 1)?;
    validate_min_length("fullName", &request.full_name, MIN_FIELD_LENGTH)?;
    validate_email(&request.email)?;

    // Avoid paying for a hash when the account obviously exists
    if state
        .db
        .find_user_by_username_or_email(&request.username, &request.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username or email already taken".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            password_hash,
            full_name: request.full_name,
            email: request.email,
        })
        .await?;

    metrics::counter!("social_registrations_total").increment(1);
    Ok(user)
}

/// POST /register
async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!("Registering user: {}", request.username);

    let user = create_account(&state, request).await?;

    info!("Registered user: {} (id {})", user.username, user.id);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_min_length("username", &request.username, MIN_FIELD_LENGTH)?;
    validate_password(&request.password, MIN_FIELD_LENGTH)?;

    debug!("Login attempt for user: {}", request.username);

    let Some(user) = state.db.get_user_by_username(&request.username).await? else {
        metrics::counter!("social_logins_total", "outcome" => "unknown_user").increment(1);
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    if !verify_password(&request.password, &user.password_hash) {
        metrics::counter!("social_logins_total", "outcome" => "bad_password").increment(1);
        return Err(ApiError::BadRequest("Login failed".to_string()));
    }

    let issued = state.jwt.issue_token(&user.username)?;

    metrics::counter!("social_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in successfully", user.username);

    Ok(Json(LoginResponse {
        payload: TokenPayload {
            token: issued.token,
            username: user.username,
            issued_at: issued.issued_at,
            expired_at: issued.expires_at,
        },
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
