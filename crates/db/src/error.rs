//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The store rejected or failed to run a statement.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    /// A returned row did not match the shape of the requested model.
    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store returned a non-object row: {0}")]
    UnexpectedRow(serde_json::Value),
}
