//! Canonical JSON text for schema objects.
//!
//! Objects are written as JSON indented by four spaces with `": "` between
//! key and value, keys in declaration order. When the object carries a
//! version it is hoisted onto the opening line:
//!
//! ```text
//! {"camliVersion":1,
//!     "camliType": "permanode",
//!     "random": "...",
//!     "camliSigner": "sha1-..."
//! }
//! ```
//!
//! The server's JSON sniffer expects exactly this placement, so the layout is
//! frozen. The signing handler returns the same text with a `camliSig` key
//! appended, and that verbatim text is what gets hashed and stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blobref::{BlobRef, HashAlgorithm};
use crate::error::{CoreError, Result};
use crate::schema::SchemaObject;

const INDENT: &[u8] = b"    ";
const OPEN: &str = "{\n";

/// Serialize a schema object to its canonical text.
pub fn canonical_json(object: &SchemaObject) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    object.serialize(&mut serializer)?;

    let body = String::from_utf8(buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;

    match object.version() {
        Some(version) => Ok(hoist_version(version, &body)),
        None => Ok(body),
    }
}

fn hoist_version(version: u32, body: &str) -> String {
    match body.strip_prefix(OPEN) {
        Some(rest) => format!("{{\"camliVersion\":{version},\n{rest}"),
        // Only an empty object serializes without a newline after the brace.
        None => format!("{{\"camliVersion\":{version}}}"),
    }
}

/// Signed object text, exactly as returned by the signing handler.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignedText(String);

impl SignedText {
    /// Wrap text received from a signer.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The blob reference this text will be stored under.
    pub fn reference(&self, algorithm: HashAlgorithm) -> BlobRef {
        BlobRef::compute(algorithm, self.0.as_bytes())
    }

    /// Parse the signature envelope for inspection.
    pub fn envelope(&self) -> Result<SignedEnvelope> {
        let header: EnvelopeHeader = serde_json::from_str(&self.0)
            .map_err(|e| CoreError::MalformedSigned(e.to_string()))?;
        let object: SchemaObject = serde_json::from_str(&self.0)
            .map_err(|e| CoreError::MalformedSigned(e.to_string()))?;

        Ok(SignedEnvelope {
            version: header.version,
            signer: header.signer,
            signature: header.signature,
            object,
        })
    }
}

impl fmt::Debug for SignedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedText({} bytes)", self.0.len())
    }
}

impl fmt::Display for SignedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    #[serde(rename = "camliVersion", default)]
    version: Option<u32>,
    #[serde(rename = "camliSigner")]
    signer: BlobRef,
    #[serde(rename = "camliSig")]
    signature: String,
}

/// A schema object plus its signer identity and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub version: Option<u32>,
    pub signer: BlobRef,
    pub signature: String,
    pub object: SchemaObject,
}
