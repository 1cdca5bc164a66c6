//! API routes

mod auth;
mod follows;
mod health;
pub mod metrics;
mod posts;
pub mod types;
mod users;
mod validation;

use axum::{Router, middleware};
use social_auth::auth_middleware;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, MetricsHandle};

/// JSON 404 for unmatched routes
async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Create the main router
///
/// `/register`, `/login` and the health checks are public; every user,
/// post and follow route sits behind the bearer token middleware.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let protected = Router::new()
        .merge(users::routes())
        .merge(posts::routes())
        .merge(follows::routes())
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected)
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.fallback(not_found)
}
