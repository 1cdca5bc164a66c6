//! Social Hub Database Layer
//!
//! This crate provides the persistence layer for Social Hub: users
//! (credentials and profile), posts and follow relationships, stored in
//! SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
