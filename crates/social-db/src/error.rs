//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl DbError {
    /// Map a unique-constraint violation to `Duplicate`, keeping every other
    /// sqlx error as a connection error.
    pub(crate) fn from_write(err: sqlx::Error, what: impl Into<String>) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DbError::Duplicate(what.into()),
            _ => DbError::Connection(err),
        }
    }
}
