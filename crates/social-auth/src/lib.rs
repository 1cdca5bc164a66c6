//! Social Hub Authentication
//!
//! This crate provides Argon2 password hashing, HS256 bearer token
//! issuance and verification, and the Axum middleware that guards
//! protected routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, IssuedToken, JwtManager, TOKEN_LIFETIME_HOURS};
pub use middleware::{AuthUser, auth_middleware};
pub use password::{hash_password, verify_password};
