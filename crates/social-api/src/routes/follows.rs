//! Follow relationship routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use social_auth::AuthUser;
use social_db::User;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;

use super::types::{FollowResponse, UserResponse};

/// Resolve the token subject to its stored account
async fn current_user(state: &AppState, caller: &AuthUser) -> Result<User, ApiError> {
    state
        .db
        .get_user_by_username(&caller.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(format!("Unknown user: {}", caller.username)))
}

async fn existing_user(state: &AppState, id: i64) -> Result<User, ApiError> {
    state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))
}

/// POST /users/{id}/follow
async fn follow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<(StatusCode, Json<FollowResponse>), ApiError> {
    let me = current_user(&state, &caller).await?;
    if me.id == id {
        return Err(ApiError::BadRequest("Users cannot follow themselves".to_string()));
    }
    let target = existing_user(&state, id).await?;

    debug!("{} following {}", me.username, target.username);

    let edge = state.db.insert_follow(target.id, me.id).await?;

    info!("{} now follows {}", me.username, target.username);
    Ok((StatusCode::CREATED, Json(edge.into())))
}

/// DELETE /users/{id}/follow
async fn unfollow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    let me = current_user(&state, &caller).await?;

    if !state.db.delete_follow(id, me.id).await? {
        return Err(ApiError::NotFound(format!("Not following user: {}", id)));
    }

    info!("{} unfollowed user {}", me.username, id);
    Ok(Json(json!({ "unfollowed": id })))
}

/// GET /users/{id}/followers
async fn followers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let user = existing_user(&state, id).await?;
    let users = state.db.list_followers(user.id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id}/following
async fn following(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let user = existing_user(&state, id).await?;
    let users = state.db.list_following(user.id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create follow routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/follow", post(follow).delete(unfollow))
        .route("/users/{id}/followers", get(followers))
        .route("/users/{id}/following", get(following))
}
