//! User management routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use social_auth::hash_password;
use social_db::UserPatch;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::auth::create_account;
use super::types::{RegisterRequest, UpdateUserRequest, UserResponse};
use super::validation::{MIN_FIELD_LENGTH, validate_min_length, validate_password};

/// Turn an update request into a validated patch
fn user_patch(request: UpdateUserRequest) -> Result<UserPatch, ApiError> {
    if request.password.is_none() && request.full_name.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    if let Some(full_name) = &request.full_name {
        validate_min_length("fullName", full_name, MIN_FIELD_LENGTH)?;
    }

    let password_hash = match &request.password {
        Some(password) => {
            validate_password(password, MIN_FIELD_LENGTH)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    Ok(UserPatch {
        password_hash,
        full_name: request.full_name,
    })
}

// ==================== User Routes ====================

/// GET /users
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.db.list_users().await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("record not found".to_string()));
    }

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!("Creating user: {}", request.username);

    let user = create_account(&state, request).await?;

    info!("Created user: {}", user.username);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    Ok(Json(user.into()))
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!("Updating user: {}", id);

    let patch = user_patch(request)?;

    let user = state
        .db
        .update_user(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    info!("Updated user: {}", user.username);
    Ok(Json(user.into()))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    debug!("Deleting user: {}", id);

    if !state.db.delete_user(id).await? {
        return Err(ApiError::NotFound(format!("User: {}", id)));
    }

    info!("Deleted user: {}", id);
    Ok(Json(json!({ "deleted": id })))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
