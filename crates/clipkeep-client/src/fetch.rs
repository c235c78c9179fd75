//! Source content retrieval.
//!
//! An image is either a remote URL, fetched over HTTP, or an inline `data:`
//! URL, decoded locally.

use bytes::Bytes;
use clipkeep_core::DataUrl;
use reqwest::Client;
use std::fmt;
use url::Url;

use crate::error::{ClientError, Result};
use crate::response::status_text;

/// Where image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote resource fetched with a GET. `raw` is the input as submitted,
    /// before URL normalisation.
    Url { raw: String, url: Url },
    /// Inline `data:` URL, kept verbatim until decoded.
    Data(String),
}

impl ImageSource {
    /// Classify user input as a data URL or a remote URL.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if DataUrl::is_data_url(input) {
            return Ok(ImageSource::Data(input.to_string()));
        }

        Url::parse(input)
            .map(|url| ImageSource::Url {
                raw: input.to_string(),
                url,
            })
            .map_err(|e| ClientError::FetchFailed(format!("invalid image URL {input:?}: {e}")))
    }

    /// The source as the user would see it (the attribute value stored for it).
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::Url { raw, .. } => raw,
            ImageSource::Data(data) => data,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Url { raw, .. } => f.write_str(raw),
            ImageSource::Data(data) => {
                let header = data.split_once(',').map(|(h, _)| h).unwrap_or(data);
                write!(f, "{header},...")
            }
        }
    }
}

/// Obtain the raw bytes behind `source`.
pub async fn fetch_source(http: &Client, source: &ImageSource) -> Result<Bytes> {
    match source {
        ImageSource::Url { url, .. } => {
            tracing::debug!(%url, "fetching image");
            let response = http
                .get(url.clone())
                .send()
                .await
                .map_err(network_failure)?;

            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::FetchFailed(format!(
                    "blob didn't load successfully; error: {}",
                    status_text(status)
                )));
            }

            let bytes = response.bytes().await.map_err(network_failure)?;
            tracing::debug!(%url, size = bytes.len(), "image fetched");
            Ok(bytes)
        }
        ImageSource::Data(data) => {
            let bytes = DataUrl::parse(data)?.decode()?;
            tracing::debug!(size = bytes.len(), "data URL decoded");
            Ok(bytes)
        }
    }
}

/// Transport failures while loading the image count as a failed fetch.
fn network_failure(e: reqwest::Error) -> ClientError {
    ClientError::FetchFailed(format!("There was a network error loading the blob: {e}"))
}
