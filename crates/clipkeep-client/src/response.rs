//! Response handling shared by every request.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Human-readable text for a status code, as browsers report it.
pub(crate) fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Reject non-2xx responses with [`ClientError::Http`].
pub(crate) fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
            status_text: status_text(status),
        });
    }
    Ok(response)
}

/// Check the status and decode a JSON body.
///
/// The body is read as text first so a bad payload surfaces as
/// [`ClientError::Parse`] rather than a transport error.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response)?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
}
