//! Storage gateway error types.

use thiserror::Error;

/// Errors that can occur when interacting with the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A non-overwrite put targeted a path that already holds an object.
    #[error("object already exists at '{0}'")]
    AlreadyExists(String),

    /// No object exists at the given path.
    #[error("object not found at '{0}'")]
    NotFound(String),

    /// The backing service rejected or failed the call.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
