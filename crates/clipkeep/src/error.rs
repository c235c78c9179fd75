//! Error types for the clip uploader.

use std::path::PathBuf;

use clipkeep_client::{core_kind, ClientError, ErrorKind};
use clipkeep_core::{BlobRef, CoreError};
use thiserror::Error;

/// Errors that abort an upload, one variant per pipeline stage.
///
/// The message of the originating error is kept so a surface can show it
/// as-is.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any network call.
    #[error("{0}")]
    Validation(#[source] CoreError),

    #[error("fetching image: {0}")]
    Fetch(#[source] ClientError),

    /// The hashing task panicked or was cancelled.
    #[error("hashing image: {0}")]
    Hash(#[source] tokio::task::JoinError),

    #[error("checking for duplicates: {0}")]
    DuplicateCheck(#[source] ClientError),

    #[error("uploading image: {0}")]
    Upload(#[source] ClientError),

    #[error("creating permanode: {0}")]
    Permanode(#[source] ClientError),

    /// One of the attribute claims failed. The permanode exists and other
    /// claims may already be stored.
    #[error("adding {attribute} to {permanode}: {source}")]
    Attribute {
        permanode: BlobRef,
        attribute: String,
        #[source]
        source: ClientError,
    },
}

impl UploadError {
    /// Classification of the originating error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::Validation(e) => core_kind(e),
            UploadError::Hash(_) => ErrorKind::Internal,
            UploadError::Fetch(e)
            | UploadError::DuplicateCheck(e)
            | UploadError::Upload(e)
            | UploadError::Permanode(e)
            | UploadError::Attribute { source: e, .. } => e.kind(),
        }
    }

    /// Whether the duplicate guard tripped.
    pub fn is_duplicate(&self) -> bool {
        self.kind() == ErrorKind::DuplicateExists
    }

    /// The permanode left behind without all of its claims, if any.
    pub fn orphaned_permanode(&self) -> Option<&BlobRef> {
        match self {
            UploadError::Attribute { permanode, .. } => Some(permanode),
            _ => None,
        }
    }
}

/// Errors loading or saving persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Result type for upload operations.
pub type Result<T> = std::result::Result<T, UploadError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[tokio::test]
    async fn hash_failure_is_internal() {
        let join_error = tokio::spawn(async { panic!("digest worker crashed") })
            .await
            .unwrap_err();

        let err = UploadError::Hash(join_error);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.kind().to_string(), "InternalError");
        assert!(err.to_string().starts_with("hashing image: "));
        assert!(err.source().is_some());
        assert!(!err.is_duplicate());
    }

    #[test]
    fn attribute_failure_names_orphan() {
        let permanode: BlobRef = "sha1-0123456789abcdef0123456789abcdef01234567".parse().unwrap();
        let err = UploadError::Attribute {
            permanode: permanode.clone(),
            attribute: "tag".into(),
            source: ClientError::SigningFailed("Internal Server Error".into()),
        };
        assert_eq!(err.kind(), ErrorKind::SigningFailed);
        assert_eq!(err.orphaned_permanode(), Some(&permanode));
    }
}
