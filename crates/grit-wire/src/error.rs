//! Wire protocol error types.

use thiserror::Error;

/// Errors from the pack decoder and smart HTTP transport.
#[derive(Debug, Error)]
pub enum WireError {
    /// Truncated or malformed pkt-line frame.
    #[error("bad pkt-line: {0}")]
    BadPktLine(String),

    /// Magic, version, checksum, or object count failure.
    #[error("bad packfile: {0}")]
    BadPackfile(String),

    /// Variable-length size encoding overflow or truncation.
    #[error("bad object header")]
    BadHeader,

    /// Packed type code outside the known set.
    #[error("invalid packed object type {0}")]
    InvalidObjectType(u8),

    /// Delta stream violated its own framing.
    #[error("bad delta: {0}")]
    BadDelta(String),

    /// The pack contains an ofs-delta object.
    #[error("ofs-delta objects are not supported")]
    UnsupportedOfsDelta,

    /// Ref-deltas remained whose bases never appeared.
    #[error("{0} ref-deltas could not be resolved")]
    UnresolvableDeltas(usize),

    /// Ref discovery found neither main nor master.
    #[error("remote advertises neither refs/heads/main nor refs/heads/master")]
    NoTarget,

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Object database failure.
    #[error("storage error: {0}")]
    Storage(#[from] grit_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
