//! Server discovery.
//!
//! The blob server publishes a JSON document describing where its handlers
//! live and which key signs on the owner's behalf. It is fetched once at
//! startup and resolved into an immutable [`Endpoints`] record.

use clipkeep_core::BlobRef;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};
use crate::response::read_json;

/// Media type the server answers discovery requests with.
pub const DISCOVERY_ACCEPT: &str = "text/x-camli-configuration";

const UPLOAD_PATH: &str = "camli/upload";
const SEARCH_FILES_PATH: &str = "camli/search/files";

/// The discovery document, as served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// Root of the blob handler (uploads go to `<blobRoot>camli/upload`).
    pub blob_root: String,
    /// Root of the search handler.
    pub search_root: String,
    /// Upload helper that wraps raw blobs into file objects.
    pub upload_helper: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_sign_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub signing: SigningDiscovery,
}

/// Signing section of the discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDiscovery {
    /// Reference of the owner's public key blob; written as `camliSigner`.
    pub public_key_blob_ref: BlobRef,
    /// Handler that signs a posted JSON object.
    pub sign_handler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_id: Option<String>,
}

/// Absolute handler URLs resolved from a discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: Url,
    pub search_files: Url,
    pub upload_helper: Url,
    pub sign: Url,
}

impl Discovery {
    /// Fetch and parse the discovery document from `server_url`.
    pub async fn fetch(http: &Client, server_url: &Url) -> Result<Self> {
        tracing::debug!(%server_url, "fetching discovery document");

        let response = http
            .get(server_url.clone())
            .header(header::ACCEPT, DISCOVERY_ACCEPT)
            .send()
            .await?;
        let discovery: Discovery = read_json(response).await?;

        tracing::info!(
            %server_url,
            signer = %discovery.signing.public_key_blob_ref,
            "retrieved server discovery data"
        );
        Ok(discovery)
    }

    /// Resolve every handler path against `server_url`.
    pub fn endpoints(&self, server_url: &Url) -> Result<Endpoints> {
        let blob_root = as_directory(server_url.join(&self.blob_root)?);
        let search_root = as_directory(server_url.join(&self.search_root)?);

        Ok(Endpoints {
            upload: blob_root.join(UPLOAD_PATH)?,
            search_files: search_root.join(SEARCH_FILES_PATH)?,
            upload_helper: server_url.join(&self.upload_helper)?,
            sign: server_url.join(&self.signing.sign_handler)?,
        })
    }

    /// The key reference claims are signed with.
    pub fn signer(&self) -> &BlobRef {
        &self.signing.public_key_blob_ref
    }
}

/// Ensure the path ends in `/` so relative joins append instead of replace.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Parse a user-supplied server URL.
pub fn parse_server_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl(format!(
            "unsupported scheme {other:?} in server URL"
        ))),
    }
}
