//! Social Hub REST API
//!
//! This crate provides the Axum-based HTTP API for Social Hub:
//! registration and login, and the token-protected user, post and
//! follow endpoints.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
