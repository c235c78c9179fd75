//! Inline `data:` URL decoding.
//!
//! Layout: `data:[<mediatype>][;base64],<payload>`. A base64-marked payload is
//! base64-decoded, anything else is percent-decoded.

use base64::Engine;
use bytes::Bytes;

use crate::error::{CoreError, Result};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";
const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

/// A parsed, not yet decoded, data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    media_type: &'a str,
    base64: bool,
    payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a data URL into its header and payload.
    pub fn parse(input: &'a str) -> Result<Self> {
        let rest = input
            .get(..SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
            .map(|_| &input[SCHEME.len()..])
            .ok_or_else(|| CoreError::UnsupportedEncoding("not a data URL".into()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CoreError::UnsupportedEncoding("data URL has no payload".into()))?;

        let (media_type, base64) = match header.strip_suffix(BASE64_MARKER) {
            Some(media_type) => (media_type, true),
            None => (header, false),
        };

        Ok(Self {
            media_type,
            base64,
            payload,
        })
    }

    /// Whether `input` carries the data URL scheme.
    pub fn is_data_url(input: &str) -> bool {
        input
            .get(..SCHEME.len())
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
    }

    /// The declared media type, or the RFC 2397 default.
    pub fn media_type(&self) -> &str {
        if self.media_type.is_empty() {
            DEFAULT_MEDIA_TYPE
        } else {
            self.media_type
        }
    }

    /// Whether the payload is base64 encoded.
    pub fn is_base64(&self) -> bool {
        self.base64
    }

    /// Decode the payload into raw bytes.
    pub fn decode(&self) -> Result<Bytes> {
        if self.base64 {
            let compact: String = self
                .payload
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            // Percent-escaped padding shows up in URLs copied out of pages.
            let compact = urlencoding::decode(&compact)
                .map_err(|e| CoreError::UnsupportedEncoding(e.to_string()))?;
            base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map(Bytes::from)
                .map_err(|e| CoreError::UnsupportedEncoding(format!("invalid base64: {e}")))
        } else {
            Ok(Bytes::from(
                urlencoding::decode_binary(self.payload.as_bytes()).into_owned(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_hello() {
        let url = DataUrl::parse("data:text/plain;base64,SGVsbG8=").unwrap();
        assert!(url.is_base64());
        assert_eq!(url.media_type(), "text/plain");
        assert_eq!(url.decode().unwrap().as_ref(), b"Hello");
    }

    #[test]
    fn test_percent_encoded() {
        let url = DataUrl::parse("data:,Hello%2C%20World").unwrap();
        assert!(!url.is_base64());
        assert_eq!(url.media_type(), DEFAULT_MEDIA_TYPE);
        assert_eq!(url.decode().unwrap().as_ref(), b"Hello, World");
    }

    #[test]
    fn test_binary_percent_payload() {
        let url = DataUrl::parse("data:application/octet-stream,%FF%00%89PNG").unwrap();
        assert_eq!(url.decode().unwrap().as_ref(), &[0xFF, 0x00, 0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_base64_with_whitespace() {
        let url = DataUrl::parse("data:image/png;base64,SGVs\nbG8=").unwrap();
        assert_eq!(url.decode().unwrap().as_ref(), b"Hello");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            DataUrl::parse("http://example.com/a.png"),
            Err(CoreError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64"),
            Err(CoreError::UnsupportedEncoding(_))
        ));

        let bad = DataUrl::parse("data:image/png;base64,!!!not-base64").unwrap();
        assert!(matches!(bad.decode(), Err(CoreError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_is_data_url() {
        assert!(DataUrl::is_data_url("data:,x"));
        assert!(DataUrl::is_data_url("DATA:,x"));
        assert!(!DataUrl::is_data_url("https://example.com"));
        assert!(!DataUrl::is_data_url("dat"));
    }
}
