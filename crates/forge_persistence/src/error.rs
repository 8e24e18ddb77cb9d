//! Error types for the persistence layer.

use thiserror::Error;

/// Result type alias for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur reading or writing subject state.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Subject not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
