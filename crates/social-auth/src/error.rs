//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Malformed authorization header")]
    InvalidAuthHeader,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Signing key is empty")]
    MissingSigningKey,

    #[error("Token signing error: {0}")]
    Signing(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::PasswordHash(_) | AuthError::MissingSigningKey | AuthError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Message returned to clients
    ///
    /// Expired and forged tokens are indistinguishable from the outside.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Missing authorization header",
            AuthError::InvalidAuthHeader => "Malformed authorization header",
            AuthError::InvalidToken | AuthError::TokenExpired => "Invalid token",
            AuthError::PasswordHash(_) | AuthError::MissingSigningKey | AuthError::Signing(_) => {
                "Internal error"
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({
            "error": self.public_message()
        }));

        (self.status(), body).into_response()
    }
}
