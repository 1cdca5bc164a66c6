//! Post routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use social_auth::AuthUser;
use social_db::{NewPost, PostPatch};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::types::{CreatePostRequest, PostResponse, UpdatePostRequest};
use super::validation::{MIN_FIELD_LENGTH, validate_min_length, validate_required};

fn validate_new_post(request: &CreatePostRequest) -> Result<(), ApiError> {
    validate_min_length("title", &request.title, MIN_FIELD_LENGTH)?;
    validate_min_length("body", &request.body, MIN_FIELD_LENGTH)?;
    validate_required("status", &request.status)?;
    if request.user_id < 1 {
        return Err(ApiError::BadRequest("userID must be at least 1".to_string()));
    }
    Ok(())
}

/// Turn an update request into a validated patch
fn post_patch(request: UpdatePostRequest) -> Result<PostPatch, ApiError> {
    let patch = PostPatch {
        title: request.title,
        body: request.body,
        status: request.status,
    };

    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if let Some(title) = &patch.title {
        validate_min_length("title", title, MIN_FIELD_LENGTH)?;
    }
    if let Some(body) = &patch.body {
        validate_min_length("body", body, MIN_FIELD_LENGTH)?;
    }
    if let Some(status) = &patch.status {
        validate_required("status", status)?;
    }

    Ok(patch)
}

// ==================== Post Routes ====================

/// GET /posts
async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let posts = state.db.list_posts().await?;

    if posts.is_empty() {
        return Err(ApiError::NotFound("record not found".to_string()));
    }

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// POST /posts
async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    validate_new_post(&request)?;

    debug!("{} creating post for user {}", caller.username, request.user_id);

    if state.db.get_user_by_id(request.user_id).await?.is_none() {
        return Err(ApiError::BadRequest(format!("Unknown user: {}", request.user_id)));
    }

    let post = state
        .db
        .insert_post(NewPost {
            title: request.title,
            body: request.body,
            user_id: request.user_id,
            status: request.status,
        })
        .await?;

    info!("Created post {} for user {}", post.id, post.user_id);
    Ok((StatusCode::CREATED, Json(post.into())))
}

/// GET /posts/{id}
async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state
        .db
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post: {}", id)))?;

    Ok(Json(post.into()))
}

/// PUT /posts/{id}
async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    debug!("Updating post: {}", id);

    let patch = post_patch(request)?;

    let post = state
        .db
        .update_post(id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Post: {}", id)))?;

    info!("Updated post: {}", post.id);
    Ok(Json(post.into()))
}

/// DELETE /posts/{id}
///
/// A missing post is a 400, unlike the user routes.
async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>, ApiError> {
    debug!("Deleting post: {}", id);

    if !state.db.delete_post(id).await? {
        return Err(ApiError::BadRequest("record is not found".to_string()));
    }

    info!("Deleted post: {}", id);
    Ok(Json(json!({ "success": "removed record" })))
}

/// Create post routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}
