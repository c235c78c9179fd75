//! Signing and blob store abstractions.
//!
//! The orchestrator only talks to the server through these two traits.
//! [`crate::ServerConnection`] implements both over HTTP; the [`memory`]
//! module holds in-process implementations for tests.

use async_trait::async_trait;
use bytes::Bytes;
use clipkeep_core::{BlobRef, HashAlgorithm, SchemaObject, SignedText};

use crate::error::Result;

/// Produces signed text for schema objects.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Signer: Send + Sync {
    /// Reference of the key objects are signed with.
    fn signer_ref(&self) -> &BlobRef;

    /// Inject the signer identity into `object`, serialize it canonically and
    /// return the signed text verbatim.
    async fn sign(&self, object: SchemaObject) -> Result<SignedText>;
}

/// Append-only, content-addressed blob store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Algorithm references are computed with.
    fn algorithm(&self) -> HashAlgorithm;

    /// Upload signed text as a blob named by its reference.
    ///
    /// Returns the reference the server confirmed.
    async fn upload_string(&self, signed: &SignedText) -> Result<BlobRef>;

    /// Upload raw bytes through the upload helper.
    ///
    /// Returns the reference of the file object the helper wrapped the
    /// bytes in, not the reference of the bytes themselves.
    async fn upload_blob(&self, blob: Bytes) -> Result<BlobRef>;

    /// Succeed when no file with this whole-content digest exists.
    ///
    /// Fails with [`crate::ClientError::DuplicateExists`] otherwise. This is
    /// a guard, not a lock: nothing stops another client uploading the same
    /// content between the check and the upload.
    async fn find_existing(&self, reference: &BlobRef) -> Result<()>;
}

/// In-memory signer and blob store for testing.
///
/// The store keeps the same content-addressed semantics as the server and
/// counts every call so tests can assert on the request sequence.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use clipkeep_core::canonical_json;

    use crate::error::ClientError;

    /// Number of calls made to each store operation.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CallCounts {
        pub upload_string: usize,
        pub upload_blob: usize,
        pub find_existing: usize,
    }

    /// In-memory blob store.
    ///
    /// All data is lost when the store is dropped. Thread-safe via RwLock.
    pub struct MemoryBlobStore {
        algorithm: HashAlgorithm,
        inner: RwLock<MemoryStoreInner>,
    }

    #[derive(Default)]
    struct MemoryStoreInner {
        /// Blobs indexed by reference.
        blobs: HashMap<BlobRef, Bytes>,

        /// Whole-content digest -> file object reference.
        files: HashMap<BlobRef, BlobRef>,

        /// Signed strings in upload order.
        strings: Vec<BlobRef>,

        calls: CallCounts,

        /// String uploads allowed before failing with HTTP 500.
        string_upload_budget: Option<usize>,
    }

    impl MemoryBlobStore {
        /// Create an empty store using the default algorithm.
        pub fn new() -> Self {
            Self::with_algorithm(HashAlgorithm::default())
        }

        pub fn with_algorithm(algorithm: HashAlgorithm) -> Self {
            Self {
                algorithm,
                inner: RwLock::new(MemoryStoreInner::default()),
            }
        }

        /// Store `data` as a file, as if another client had uploaded it.
        pub fn insert_existing(&self, data: &[u8]) -> BlobRef {
            let mut inner = self.inner.write().unwrap();
            Self::store_file(&mut inner, self.algorithm, Bytes::copy_from_slice(data))
        }

        /// Let `n` more string uploads succeed, then fail every one after.
        pub fn fail_string_uploads_after(&self, n: usize) {
            self.inner.write().unwrap().string_upload_budget = Some(n);
        }

        pub fn calls(&self) -> CallCounts {
            self.inner.read().unwrap().calls
        }

        pub fn get(&self, reference: &BlobRef) -> Option<Bytes> {
            self.inner.read().unwrap().blobs.get(reference).cloned()
        }

        pub fn contains(&self, reference: &BlobRef) -> bool {
            self.inner.read().unwrap().blobs.contains_key(reference)
        }

        /// Signed strings, oldest first.
        pub fn signed_strings(&self) -> Vec<SignedText> {
            let inner = self.inner.read().unwrap();
            inner
                .strings
                .iter()
                .filter_map(|r| inner.blobs.get(r))
                .map(|b| SignedText::new(String::from_utf8_lossy(b).into_owned()))
                .collect()
        }

        pub fn blob_count(&self) -> usize {
            self.inner.read().unwrap().blobs.len()
        }

        /// Store the raw bytes plus a file object pointing at them.
        fn store_file(inner: &mut MemoryStoreInner, algorithm: HashAlgorithm, data: Bytes) -> BlobRef {
            let whole = BlobRef::compute(algorithm, &data);
            let file = format!(
                "{{\"camliVersion\":1,\n    \"camliType\": \"file\",\n    \"size\": {},\n    \"wholeRef\": \"{}\"\n}}",
                data.len(),
                whole
            );
            let file_ref = BlobRef::compute(algorithm, file.as_bytes());

            inner.blobs.insert(whole.clone(), data);
            inner.blobs.insert(file_ref.clone(), Bytes::from(file));
            inner.files.insert(whole, file_ref.clone());
            file_ref
        }
    }

    impl Default for MemoryBlobStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        fn algorithm(&self) -> HashAlgorithm {
            self.algorithm
        }

        async fn upload_string(&self, signed: &SignedText) -> Result<BlobRef> {
            let mut inner = self.inner.write().unwrap();
            inner.calls.upload_string += 1;

            if let Some(budget) = inner.string_upload_budget.as_mut() {
                if *budget == 0 {
                    return Err(ClientError::Http {
                        status: 500,
                        status_text: "Internal Server Error".into(),
                    });
                }
                *budget -= 1;
            }

            let reference = signed.reference(self.algorithm);
            inner
                .blobs
                .insert(reference.clone(), Bytes::copy_from_slice(signed.as_bytes()));
            inner.strings.push(reference.clone());
            Ok(reference)
        }

        async fn upload_blob(&self, blob: Bytes) -> Result<BlobRef> {
            let mut inner = self.inner.write().unwrap();
            inner.calls.upload_blob += 1;
            Ok(Self::store_file(&mut inner, self.algorithm, blob))
        }

        async fn find_existing(&self, reference: &BlobRef) -> Result<()> {
            let mut inner = self.inner.write().unwrap();
            inner.calls.find_existing += 1;

            if inner.files.contains_key(reference) {
                return Err(ClientError::DuplicateExists {
                    reference: reference.clone(),
                    matches: 1,
                });
            }
            Ok(())
        }
    }

    /// Signer that appends a deterministic `camliSig` locally.
    ///
    /// The signature is the digest of the canonical text, which is enough to
    /// make signed text unique per object without a key.
    pub struct MemorySigner {
        signer: BlobRef,
        signed: RwLock<Vec<SchemaObject>>,
    }

    impl MemorySigner {
        pub fn new(signer: BlobRef) -> Self {
            Self {
                signer,
                signed: RwLock::new(Vec::new()),
            }
        }

        /// Objects signed so far, in call order.
        pub fn signed_objects(&self) -> Vec<SchemaObject> {
            self.signed.read().unwrap().clone()
        }

        pub fn sign_count(&self) -> usize {
            self.signed.read().unwrap().len()
        }
    }

    #[async_trait]
    impl Signer for MemorySigner {
        fn signer_ref(&self) -> &BlobRef {
            &self.signer
        }

        async fn sign(&self, mut object: SchemaObject) -> Result<SignedText> {
            object.set_signer(self.signer.clone());
            let clear = canonical_json(&object)?;
            let signature = HashAlgorithm::Sha1.digest_hex(clear.as_bytes());

            let body = clear.trim_end().trim_end_matches('}').trim_end();
            let signed = format!("{body},\"camliSig\":\"{signature}\"}}\n");

            self.signed.write().unwrap().push(object);
            Ok(SignedText::new(signed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{MemoryBlobStore, MemorySigner};
    use super::*;
    use crate::error::ClientError;
    use clipkeep_core::{compute_reference, Permanode};

    #[tokio::test]
    async fn test_find_existing_is_idempotent() {
        let store = MemoryBlobStore::new();
        let reference = compute_reference(b"image bytes");

        store.find_existing(&reference).await.unwrap();
        store.find_existing(&reference).await.unwrap();
        assert_eq!(store.calls().find_existing, 2);
    }

    #[tokio::test]
    async fn test_upload_blob_returns_file_ref() {
        let store = MemoryBlobStore::new();
        let data = Bytes::from_static(b"image bytes");
        let whole = compute_reference(&data);

        let file_ref = store.upload_blob(data.clone()).await.unwrap();
        assert_ne!(file_ref, whole);
        assert_eq!(store.get(&whole), Some(data));
        assert!(store.contains(&file_ref));

        match store.find_existing(&whole).await {
            Err(ClientError::DuplicateExists { reference, matches }) => {
                assert_eq!(reference, whole);
                assert_eq!(matches, 1);
            }
            other => panic!("expected DuplicateExists, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_string_is_content_addressed() {
        let store = MemoryBlobStore::new();
        let text = SignedText::new("{\"camliVersion\":1}");

        let a = store.upload_string(&text).await.unwrap();
        let b = store.upload_string(&text).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, compute_reference(text.as_bytes()));
        assert_eq!(store.blob_count(), 1);
    }

    #[tokio::test]
    async fn test_string_upload_budget() {
        let store = MemoryBlobStore::new();
        store.fail_string_uploads_after(1);

        store.upload_string(&SignedText::new("a")).await.unwrap();
        let err = store.upload_string(&SignedText::new("b")).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_memory_signer_envelope() {
        let signer = MemorySigner::new(compute_reference(b"key"));
        let signed = signer
            .sign(Permanode::with_random("nonce").into())
            .await
            .unwrap();

        assert!(signed.as_str().starts_with("{\"camliVersion\":1,\n"));
        let envelope = signed.envelope().unwrap();
        assert_eq!(envelope.signer, compute_reference(b"key"));
        assert_eq!(envelope.signature.len(), 40);
        assert_eq!(signer.sign_count(), 1);
    }
}
