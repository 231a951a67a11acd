//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Migration error: {0}")]
    Migration(String),
}
