//! Repository error types.

use thiserror::Error;

/// Errors from repository-level operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Expected a commit object.
    #[error("object {0} is not a commit")]
    NotACommit(String),

    /// Expected a tree object.
    #[error("object {0} is not a tree")]
    NotATree(String),

    /// Expected a blob object.
    #[error("object {0} is not a blob")]
    NotABlob(String),

    /// Object database failure.
    #[error("storage error: {0}")]
    Storage(#[from] grit_storage::StorageError),

    /// Transport or pack failure.
    #[error("wire error: {0}")]
    Wire(#[from] grit_wire::WireError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;
