//! HTTP connection to a blob server.
//!
//! | Operation     | Method | Handler        | Request                       | Response used         |
//! |---------------|--------|----------------|-------------------------------|-----------------------|
//! | sign          | POST   | sign handler   | form `json=<canonical text>`  | raw body              |
//! | upload string | POST   | blob upload    | multipart part named `<ref>`  | `received[0].blobRef` |
//! | upload blob   | POST   | upload helper  | multipart part `blob`         | `got[0].fileref`      |
//! | find existing | GET    | search files   | `?wholedigest=<ref>`          | `files`               |
//!
//! No retries and no timeouts: the first failure is returned to the caller.

use async_trait::async_trait;
use bytes::Bytes;
use clipkeep_core::{canonical_json, BlobRef, HashAlgorithm, SchemaObject, SignedText};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::discovery::{Discovery, Endpoints};
use crate::error::{ClientError, Result};
use crate::response::{read_json, status_text};
use crate::transport::{BlobStore, Signer};

/// Form field the upload helper reads the raw blob from.
const BLOB_FIELD: &str = "blob";

/// Explicitly constructed connection to one server.
///
/// Built once from the discovery document and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ServerConnection {
    http: Client,
    endpoints: Endpoints,
    signer: BlobRef,
    algorithm: HashAlgorithm,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    received: Vec<ReceivedBlob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceivedBlob {
    blob_ref: BlobRef,
}

#[derive(Debug, Deserialize)]
struct UploadHelperResponse {
    #[serde(default)]
    got: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    fileref: BlobRef,
}

#[derive(Debug, Deserialize)]
struct SearchFilesResponse {
    // The server sends `null` rather than `[]` when nothing matches.
    #[serde(default)]
    files: Option<Vec<serde_json::Value>>,
}

impl ServerConnection {
    /// Create a connection from already-resolved endpoints.
    pub fn new(http: Client, endpoints: Endpoints, signer: BlobRef) -> Self {
        Self {
            http,
            endpoints,
            signer,
            algorithm: HashAlgorithm::default(),
        }
    }

    /// Fetch the discovery document and build a connection from it.
    pub async fn connect(http: Client, server_url: &Url) -> Result<Self> {
        let discovery = Discovery::fetch(&http, server_url).await?;
        Self::from_discovery(http, server_url, &discovery)
    }

    /// Build a connection from a discovery document fetched earlier.
    pub fn from_discovery(http: Client, server_url: &Url, discovery: &Discovery) -> Result<Self> {
        let endpoints = discovery.endpoints(server_url)?;
        Ok(Self::new(http, endpoints, discovery.signer().clone()))
    }

    /// Use a different reference algorithm than the default.
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

#[async_trait]
impl Signer for ServerConnection {
    fn signer_ref(&self) -> &BlobRef {
        &self.signer
    }

    async fn sign(&self, mut object: SchemaObject) -> Result<SignedText> {
        object.set_signer(self.signer.clone());
        let clear = canonical_json(&object)?;

        let response = self
            .http
            .post(self.endpoints.sign.clone())
            .form(&[("json", clear.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), kind = object.type_name(), "signing rejected");
            return Err(ClientError::SigningFailed(status_text(status)));
        }

        let signed = SignedText::new(response.text().await?);
        tracing::debug!(kind = object.type_name(), "object signed");
        Ok(signed)
    }
}

#[async_trait]
impl BlobStore for ServerConnection {
    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    async fn upload_string(&self, signed: &SignedText) -> Result<BlobRef> {
        let reference = signed.reference(self.algorithm);
        let part = Part::text(signed.as_str().to_owned()).file_name(reference.to_string());
        let form = Form::new().part(reference.to_string(), part);

        let response = self
            .http
            .post(self.endpoints.upload.clone())
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = read_json(response).await?;

        let confirmed = body
            .received
            .into_iter()
            .next()
            .map(|r| r.blob_ref)
            .ok_or_else(|| ClientError::Parse("upload response lists no received blobs".into()))?;

        if confirmed != reference {
            tracing::warn!(local = %reference, server = %confirmed, "server confirmed a different reference");
        }
        tracing::debug!(blob_ref = %confirmed, "string uploaded");
        Ok(confirmed)
    }

    async fn upload_blob(&self, blob: Bytes) -> Result<BlobRef> {
        let size = blob.len();
        let part = Part::stream_with_length(blob, size as u64).file_name(BLOB_FIELD);
        let form = Form::new().part(BLOB_FIELD, part);

        let response = self
            .http
            .post(self.endpoints.upload_helper.clone())
            .multipart(form)
            .send()
            .await?;
        let body: UploadHelperResponse = read_json(response).await?;

        let fileref = body
            .got
            .into_iter()
            .next()
            .map(|f| f.fileref)
            .ok_or_else(|| ClientError::Parse("upload helper response lists no files".into()))?;

        tracing::debug!(%fileref, size, "blob uploaded");
        Ok(fileref)
    }

    async fn find_existing(&self, reference: &BlobRef) -> Result<()> {
        let response = self
            .http
            .get(self.endpoints.search_files.clone())
            .query(&[("wholedigest", reference.as_str())])
            .send()
            .await?;
        let body: SearchFilesResponse = read_json(response).await?;

        let matches = body.files.map(|f| f.len()).unwrap_or(0);
        if matches > 0 {
            return Err(ClientError::DuplicateExists {
                reference: reference.clone(),
                matches,
            });
        }

        tracing::debug!(%reference, "no existing file");
        Ok(())
    }
}
