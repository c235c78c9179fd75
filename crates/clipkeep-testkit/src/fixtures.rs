//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clipkeep::{ClipUploader, UploaderConfig};
use clipkeep_client::memory::{MemoryBlobStore, MemorySigner};
use clipkeep_core::{BlobRef, Claim, HashAlgorithm, PermanodeState, SchemaObject};
use reqwest::Client;

/// The eight-byte PNG signature followed by an empty IHDR header.
pub const SAMPLE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// A test fixture with an in-memory signer and store.
pub struct TestFixture {
    pub signer: Arc<MemorySigner>,
    pub store: Arc<MemoryBlobStore>,
}

impl TestFixture {
    /// Create a fixture signing as the key `"owner key"`.
    pub fn new() -> Self {
        Self::with_algorithm(HashAlgorithm::default())
    }

    /// Create a fixture whose store references blobs with `algorithm`.
    pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
        Self {
            signer: Arc::new(MemorySigner::new(Self::owner_key())),
            store: Arc::new(MemoryBlobStore::with_algorithm(algorithm)),
        }
    }

    /// Reference of the key every object is signed with.
    pub fn owner_key() -> BlobRef {
        BlobRef::compute(HashAlgorithm::Sha1, b"owner key")
    }

    /// An uploader with the default configuration.
    pub fn uploader(&self) -> ClipUploader<MemorySigner, MemoryBlobStore> {
        self.uploader_with(UploaderConfig::default())
    }

    pub fn uploader_with(&self, config: UploaderConfig) -> ClipUploader<MemorySigner, MemoryBlobStore> {
        ClipUploader::new(
            Arc::clone(&self.signer),
            Arc::clone(&self.store),
            Client::new(),
            config,
        )
    }

    /// Every claim in the store, parsed back out of its signed text.
    pub fn stored_claims(&self) -> Vec<Claim> {
        self.store
            .signed_strings()
            .iter()
            .filter_map(|s| s.envelope().ok())
            .filter_map(|e| match e.object {
                SchemaObject::Claim(c) => Some(c),
                SchemaObject::Permanode(_) => None,
            })
            .collect()
    }

    /// Attribute state of `permanode` folded from the stored claims.
    pub fn state(&self, permanode: &BlobRef) -> PermanodeState {
        PermanodeState::from_claims(permanode.clone(), &self.stored_claims())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `bytes` as a base64 `data:` URL.
pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// [`SAMPLE_PNG`] as a data URL.
pub fn png_data_url() -> String {
    data_url("image/png", SAMPLE_PNG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep::ClipRequest;
    use clipkeep_client::ImageSource;
    use clipkeep_core::attr;

    #[test]
    fn test_data_url_shape() {
        assert_eq!(data_url("text/plain", b"Hello"), "data:text/plain;base64,SGVsbG8=");
    }

    #[tokio::test]
    async fn test_fixture_upload() {
        let fixture = TestFixture::new();
        let request = ClipRequest::new(
            ImageSource::parse(&png_data_url()).unwrap(),
            "https://example.com/",
            "x,y",
        );

        let receipt = fixture.uploader().upload(&request).await.unwrap();
        let state = fixture.state(&receipt.permanode);
        assert_eq!(state.get(attr::CONTENT), Some(receipt.file.as_str()));
        assert_eq!(fixture.stored_claims().len(), 5);
    }

    #[tokio::test]
    async fn test_fixture_algorithm() {
        let fixture = TestFixture::with_algorithm(HashAlgorithm::Sha224);
        let request = ClipRequest::new(
            ImageSource::parse(&png_data_url()).unwrap(),
            "https://example.com/",
            "",
        );

        let receipt = fixture.uploader().upload(&request).await.unwrap();
        assert_eq!(receipt.content.algorithm(), HashAlgorithm::Sha224);
        assert_eq!(receipt.permanode.algorithm(), HashAlgorithm::Sha224);
    }
}
