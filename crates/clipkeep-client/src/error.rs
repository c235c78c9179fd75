//! Error types for the blob server client.

use clipkeep_core::{BlobRef, CoreError};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failure, for surfaces that render errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Http,
    Parse,
    SigningFailed,
    DuplicateExists,
    FetchFailed,
    UnsupportedEncoding,
    Validation,
    /// Local failure not caused by input or server, e.g. a crashed worker task.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Network => "NetworkError",
            ErrorKind::Http => "HttpError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::SigningFailed => "SigningFailed",
            ErrorKind::DuplicateExists => "DuplicateExists",
            ErrorKind::FetchFailed => "FetchFailed",
            ErrorKind::UnsupportedEncoding => "UnsupportedEncoding",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

/// Errors that can occur talking to the blob server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, reset, TLS, body read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Server response was not the JSON we expected.
    #[error("malformed server response: {0}")]
    Parse(String),

    /// The signing handler refused the object.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Content with this digest is already on the server.
    #[error("{reference} already exists on the server ({matches} match(es))")]
    DuplicateExists { reference: BlobRef, matches: usize },

    /// The source content could not be retrieved.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// An endpoint or source URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Error from the pure primitives (encoding, tags, references).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Http { .. } => ErrorKind::Http,
            ClientError::Parse(_) => ErrorKind::Parse,
            ClientError::SigningFailed(_) => ErrorKind::SigningFailed,
            ClientError::DuplicateExists { .. } => ErrorKind::DuplicateExists,
            ClientError::FetchFailed(_) => ErrorKind::FetchFailed,
            ClientError::InvalidUrl(_) => ErrorKind::Validation,
            ClientError::Core(e) => core_kind(e),
        }
    }
}

/// Classify an error from the pure primitives.
pub fn core_kind(e: &CoreError) -> ErrorKind {
    match e {
        CoreError::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
        CoreError::InvalidTags(_) => ErrorKind::Validation,
        CoreError::InvalidReference(_)
        | CoreError::UnknownAlgorithm(_)
        | CoreError::EncodingError(_)
        | CoreError::MalformedSigned(_) => ErrorKind::Parse,
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
