//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            username: claims.sub.clone(),
        }
    }
}

/// Extract bearer token from authorization header
///
/// The header must be exactly `Bearer <token>`.
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Authentication middleware
///
/// Rejects the request unless it carries a valid, unexpired bearer token.
/// On success the [`AuthUser`] is added to the request extensions.
pub async fn auth_middleware(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(&jwt_manager, &request).inspect_err(|e| {
        debug!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        metrics::counter!("social_auth_rejections_total").increment(1);
    })?;

    debug!("Authenticated user: {}", user.username);

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn authenticate(jwt_manager: &JwtManager, request: &Request) -> Result<AuthUser, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;
    if header.is_empty() {
        return Err(AuthError::MissingAuthHeader);
    }

    let token = extract_bearer_token(header)?;
    let claims = jwt_manager.validate_token(token)?;
    Ok(AuthUser::from_claims(&claims))
}
