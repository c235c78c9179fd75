//! Error types for Clipkeep Core.

use thiserror::Error;

/// Errors raised by the pure primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid blob reference: {0}")]
    InvalidReference(String),

    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("At least one invalid tag was supplied: {0:?}")]
    InvalidTags(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("malformed signed object: {0}")]
    MalformedSigned(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::EncodingError(e.to_string())
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
