//! The clip uploader: fetch, hash, dedup, upload, create permanode, attach
//! attributes.
//!
//! One call to [`ClipUploader::upload`] drives a single linear pipeline:
//!
//! ```text
//! Fetching -> Hashing -> CheckingDuplicates -> Uploading
//!          -> CreatingPermanode -> AttachingAttributes -> Done
//! ```
//!
//! The first failure aborts the rest. Nothing is rolled back: a failure while
//! attaching attributes leaves a permanode with only some of its claims.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use clipkeep_client::{fetch_source, publish, BlobStore, ImageSource, ServerConnection, Signer};
use clipkeep_core::{attr, BlobRef, ClaimType, TagList};
use futures::future::join_all;
use reqwest::Client;
use tokio::sync::mpsc;

use crate::error::{Result, UploadError};

/// Configuration for the uploader.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Issue attribute claims concurrently once the permanode exists.
    /// When false they are written one after another in a fixed order.
    pub concurrent_claims: bool,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            concurrent_claims: true,
        }
    }
}

/// Pipeline stages, reported as each one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadStage {
    Fetching,
    Hashing,
    CheckingDuplicates,
    Uploading,
    CreatingPermanode,
    AttachingAttributes,
    Done,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UploadStage::Fetching => "Fetching image",
            UploadStage::Hashing => "Computing reference",
            UploadStage::CheckingDuplicates => "Checking for duplicates",
            UploadStage::Uploading => "Uploading image",
            UploadStage::CreatingPermanode => "Creating permanode",
            UploadStage::AttachingAttributes => "Adding attributes",
            UploadStage::Done => "Success!",
        };
        f.write_str(text)
    }
}

/// What the user submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    /// Where the image bytes come from.
    pub image: ImageSource,
    /// Page the image was found on.
    pub page_url: String,
    /// Raw comma-separated tag input.
    pub tags: String,
}

impl ClipRequest {
    pub fn new(image: ImageSource, page_url: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            image,
            page_url: page_url.into(),
            tags: tags.into(),
        }
    }
}

/// References produced by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// The permanode the clip lives under.
    pub permanode: BlobRef,
    /// Reference of the raw image bytes.
    pub content: BlobRef,
    /// File object the upload helper wrapped the bytes in.
    pub file: BlobRef,
    /// Every attribute claim, in the order they were issued.
    pub claims: Vec<BlobRef>,
}

/// One attribute write.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeWrite {
    claim_type: ClaimType,
    attribute: &'static str,
    value: String,
}

/// Drives the upload-and-claim pipeline.
///
/// The signer and store are injected so tests can substitute in-memory
/// versions; in production both are the same [`ServerConnection`].
pub struct ClipUploader<S: Signer, B: BlobStore> {
    signer: Arc<S>,
    store: Arc<B>,
    http: Client,
    config: UploaderConfig,
    progress: Option<mpsc::UnboundedSender<UploadStage>>,
}

impl ClipUploader<ServerConnection, ServerConnection> {
    /// Uploader backed by a single HTTP connection.
    pub fn from_connection(connection: ServerConnection, config: UploaderConfig) -> Self {
        let http = connection.http().clone();
        let connection = Arc::new(connection);
        Self::new(Arc::clone(&connection), connection, http, config)
    }
}

impl<S: Signer, B: BlobStore> ClipUploader<S, B> {
    /// Create an uploader.
    ///
    /// `http` is used only to fetch remote images.
    pub fn new(signer: Arc<S>, store: Arc<B>, http: Client, config: UploaderConfig) -> Self {
        Self {
            signer,
            store,
            http,
            config,
            progress: None,
        }
    }

    /// Report each stage on `progress` as it starts.
    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<UploadStage>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Run the whole pipeline for one clip.
    pub async fn upload(&self, request: &ClipRequest) -> Result<UploadReceipt> {
        // Nothing touches the network until the tags are known to be valid.
        let tags = TagList::parse(&request.tags).map_err(UploadError::Validation)?;

        self.report(UploadStage::Fetching);
        let blob = fetch_source(&self.http, &request.image)
            .await
            .map_err(UploadError::Fetch)?;

        self.report(UploadStage::Hashing);
        let content = self.compute_reference(blob.clone()).await?;
        tracing::info!(source = %request.image, %content, size = blob.len(), "image fetched");

        self.report(UploadStage::CheckingDuplicates);
        self.store
            .find_existing(&content)
            .await
            .map_err(UploadError::DuplicateCheck)?;

        self.report(UploadStage::Uploading);
        let file = self
            .store
            .upload_blob(blob)
            .await
            .map_err(UploadError::Upload)?;
        tracing::info!(%file, "image uploaded");

        self.report(UploadStage::CreatingPermanode);
        let permanode = publish::create_permanode(self.signer.as_ref(), self.store.as_ref())
            .await
            .map_err(UploadError::Permanode)?;
        tracing::info!(%permanode, "permanode created");

        self.report(UploadStage::AttachingAttributes);
        let writes = attribute_writes(&file, request, tags);
        let claims = self.attach(&permanode, &writes).await?;

        self.report(UploadStage::Done);
        tracing::info!(%permanode, claims = claims.len(), "clip stored");

        Ok(UploadReceipt {
            permanode,
            content,
            file,
            claims,
        })
    }

    /// Hash on the blocking pool; the caller keeps its own handle on the bytes.
    async fn compute_reference(&self, blob: Bytes) -> Result<BlobRef> {
        let algorithm = self.store.algorithm();
        tokio::task::spawn_blocking(move || BlobRef::compute(algorithm, &blob))
            .await
            .map_err(UploadError::Hash)
    }

    async fn attach(&self, permanode: &BlobRef, writes: &[AttributeWrite]) -> Result<Vec<BlobRef>> {
        let signer = self.signer.as_ref();
        let store = self.store.as_ref();

        let pending = writes.iter().map(|write| async move {
            publish::update_permanode_attr(
                signer,
                store,
                permanode,
                write.claim_type,
                write.attribute,
                &write.value,
            )
            .await
            .map_err(|source| UploadError::Attribute {
                permanode: permanode.clone(),
                attribute: write.attribute.to_string(),
                source,
            })
        });

        if self.config.concurrent_claims {
            // Every write settles before the first error, if any, is returned.
            let results = join_all(pending).await;
            let failed = results.iter().filter(|r| r.is_err()).count();
            if failed > 0 {
                tracing::warn!(%permanode, failed, "attribute claims failed");
            }
            results.into_iter().collect()
        } else {
            let mut claims = Vec::with_capacity(writes.len());
            for write in pending {
                claims.push(write.await?);
            }
            Ok(claims)
        }
    }

    fn report(&self, stage: UploadStage) {
        tracing::debug!(%stage, "upload stage");
        if let Some(progress) = &self.progress {
            // A surface that stopped listening does not stop the upload.
            let _ = progress.send(stage);
        }
    }
}

/// The claims a clip gets: content, image source, page, then one per tag.
fn attribute_writes(file: &BlobRef, request: &ClipRequest, tags: TagList) -> Vec<AttributeWrite> {
    let mut writes = vec![
        AttributeWrite {
            claim_type: ClaimType::SetAttribute,
            attribute: attr::CONTENT,
            value: file.to_string(),
        },
        AttributeWrite {
            claim_type: ClaimType::SetAttribute,
            attribute: attr::IMG_SRC,
            value: request.image.as_str().to_string(),
        },
        AttributeWrite {
            claim_type: ClaimType::SetAttribute,
            attribute: attr::FOUND_AT,
            value: request.page_url.clone(),
        },
    ];

    writes.extend(tags.into_iter().map(|tag| AttributeWrite {
        claim_type: ClaimType::AddAttribute,
        attribute: attr::TAG,
        value: tag,
    }));
    writes
}
