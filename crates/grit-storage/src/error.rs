//! Storage error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the object database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object not present in the database.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Stored bytes do not decode to a valid object.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
