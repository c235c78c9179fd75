//! Schema objects exchanged with the blob server.
//!
//! Two kinds exist, discriminated by the `camliType` field:
//!
//! - **Permanode**: a stable identity. Holds only a random nonce, so every
//!   creation yields a distinct reference.
//! - **Claim**: an immutable assertion that sets or adds one attribute value
//!   on a permanode.
//!
//! Field order in these structs is the order keys appear in the serialized
//! JSON. The version is not serialized by serde; [`crate::canonical`] hoists
//! it onto the first line.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::blobref::BlobRef;

/// Schema version written into every object.
pub const SCHEMA_VERSION: u32 = 1;

/// Well-known attribute names.
pub mod attr {
    /// Points a permanode at its current content (a file reference).
    pub const CONTENT: &str = "camliContent";
    /// URL the image was fetched from.
    pub const IMG_SRC: &str = "imgSrc";
    /// URL of the page the image was found on.
    pub const FOUND_AT: &str = "foundAt";
    /// Multi-valued tag attribute.
    pub const TAG: &str = "tag";
}

/// Kind of attribute mutation a claim performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimType {
    /// Replace every value of the attribute.
    SetAttribute,
    /// Append a value to a multi-valued attribute.
    AddAttribute,
}

impl ClaimType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ClaimType::SetAttribute => "set-attribute",
            ClaimType::AddAttribute => "add-attribute",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permanode: mutable-by-claims identity object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permanode {
    #[serde(rename = "camliVersion", default, skip_serializing)]
    pub version: Option<u32>,

    /// Nonce making each permanode's reference unique.
    pub random: String,

    #[serde(rename = "camliSigner", default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<BlobRef>,
}

impl Permanode {
    /// A fresh permanode with a random nonce.
    pub fn new() -> Self {
        let mut nonce = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self::with_random(hex::encode(nonce))
    }

    /// A permanode with a caller-chosen nonce.
    pub fn with_random(random: impl Into<String>) -> Self {
        Self {
            version: Some(SCHEMA_VERSION),
            random: random.into(),
            signer: None,
        }
    }
}

impl Default for Permanode {
    fn default() -> Self {
        Self::new()
    }
}

/// A single attribute assertion against a permanode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "camliVersion", default, skip_serializing)]
    pub version: Option<u32>,

    #[serde(rename = "permaNode")]
    pub permanode: BlobRef,

    #[serde(rename = "claimType")]
    pub claim_type: ClaimType,

    #[serde(rename = "claimDate", with = "claim_date")]
    pub claim_date: DateTime<Utc>,

    pub attribute: String,

    pub value: String,

    #[serde(rename = "camliSigner", default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<BlobRef>,
}

impl Claim {
    /// Build a claim dated `claim_date`.
    pub fn new(
        permanode: BlobRef,
        claim_type: ClaimType,
        attribute: impl Into<String>,
        value: impl Into<String>,
        claim_date: DateTime<Utc>,
    ) -> Self {
        Self {
            version: Some(SCHEMA_VERSION),
            permanode,
            claim_type,
            claim_date,
            attribute: attribute.into(),
            value: value.into(),
            signer: None,
        }
    }

    /// Build a claim dated now.
    pub fn now(
        permanode: BlobRef,
        claim_type: ClaimType,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(permanode, claim_type, attribute, value, Utc::now())
    }
}

/// Discriminated union over every object the client signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "camliType", rename_all = "lowercase")]
pub enum SchemaObject {
    Permanode(Permanode),
    Claim(Claim),
}

impl SchemaObject {
    /// The schema version, if the object carries one.
    pub fn version(&self) -> Option<u32> {
        match self {
            SchemaObject::Permanode(p) => p.version,
            SchemaObject::Claim(c) => c.version,
        }
    }

    /// The signer key reference, once injected.
    pub fn signer(&self) -> Option<&BlobRef> {
        match self {
            SchemaObject::Permanode(p) => p.signer.as_ref(),
            SchemaObject::Claim(c) => c.signer.as_ref(),
        }
    }

    /// Inject the signer identity before serialization.
    pub fn set_signer(&mut self, signer: BlobRef) {
        match self {
            SchemaObject::Permanode(p) => p.signer = Some(signer),
            SchemaObject::Claim(c) => c.signer = Some(signer),
        }
    }

    /// The `camliType` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaObject::Permanode(_) => "permanode",
            SchemaObject::Claim(_) => "claim",
        }
    }
}

impl From<Permanode> for SchemaObject {
    fn from(p: Permanode) -> Self {
        SchemaObject::Permanode(p)
    }
}

impl From<Claim> for SchemaObject {
    fn from(c: Claim) -> Self {
        SchemaObject::Claim(c)
    }
}

/// RFC 3339 UTC with millisecond precision and a `Z` suffix.
mod claim_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobref::compute_reference;
    use chrono::TimeZone;

    fn fixed_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_permanode_nonce_is_unique() {
        let a = Permanode::new();
        let b = Permanode::new();
        assert_ne!(a.random, b.random);
        assert_eq!(a.version, Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_claim_serializes_in_field_order() {
        let claim = Claim::new(
            compute_reference(b"pn"),
            ClaimType::AddAttribute,
            attr::TAG,
            "cats",
            fixed_date(),
        );
        let json = serde_json::to_string(&SchemaObject::from(claim)).unwrap();
        assert_eq!(
            json,
            format!(
                "{{\"camliType\":\"claim\",\"permaNode\":\"{}\",\"claimType\":\"add-attribute\",\
                 \"claimDate\":\"2015-03-14T09:26:53.000Z\",\"attribute\":\"tag\",\"value\":\"cats\"}}",
                compute_reference(b"pn")
            )
        );
    }

    #[test]
    fn test_signer_is_injected_last() {
        let mut object = SchemaObject::from(Permanode::with_random("0.5"));
        assert!(object.signer().is_none());
        object.set_signer(compute_reference(b"key"));

        let json = serde_json::to_string(&object).unwrap();
        assert!(json.starts_with("{\"camliType\":\"permanode\",\"random\":\"0.5\""));
        assert!(json.ends_with(&format!("\"camliSigner\":\"{}\"}}", compute_reference(b"key"))));
    }

    #[test]
    fn test_deserialize_reads_version_and_ignores_signature() {
        let json = r#"{"camliVersion":1,"camliType":"permanode","random":"x","camliSig":"abc"}"#;
        let object: SchemaObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.version(), Some(1));
        assert_eq!(object.type_name(), "permanode");
    }

    #[test]
    fn test_claim_type_strings() {
        assert_eq!(ClaimType::SetAttribute.to_string(), "set-attribute");
        assert_eq!(
            serde_json::to_string(&ClaimType::AddAttribute).unwrap(),
            "\"add-attribute\""
        );
    }
}
