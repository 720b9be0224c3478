//! Error types for snapshot decoding and digest extraction.

use thiserror::Error;

/// Errors that can occur while decoding a metadata snapshot or digesting it.
#[derive(Debug, Error)]
pub enum DigestError {
    /// An SSH key line has no `username:` prefix.
    #[error("malformed ssh key on line {line}: missing ':' separator")]
    MalformedKeyLine {
        /// 1-based line number within the key blob.
        line: usize,
    },

    /// A field the digest depends on is missing from the snapshot.
    #[error("shape violation: missing {0}")]
    ShapeViolation(String),

    /// The provider name is not recognized.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Snapshot exceeds the configured size limit.
    #[error("snapshot too large: {0} bytes exceeds limit of {1} bytes")]
    TooLarge(usize, usize),

    /// JSON (de)serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DigestError>;
