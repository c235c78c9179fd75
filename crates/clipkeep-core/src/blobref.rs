//! Content-derived blob references.
//!
//! A reference names a blob by the digest of its bytes, written as
//! `<algorithm>-<lowercase hex digest>`. The server deduplicates and
//! addresses everything by these strings.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use sha2::Sha224;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Digest algorithms a blob reference may be computed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1, the algorithm the blob server names blobs with by default.
    #[default]
    Sha1,
    /// SHA-224.
    Sha224,
    /// Blake3 (32-byte output).
    Blake3,
}

impl HashAlgorithm {
    /// The prefix written before the dash in a reference.
    pub const fn prefix(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha224 => "sha224",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Number of hex characters in a digest.
    pub const fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha224 => 56,
            HashAlgorithm::Blake3 => 64,
        }
    }

    /// Hex digest of the given bytes.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            HashAlgorithm::Sha224 => hex::encode(Sha224::digest(data)),
            HashAlgorithm::Blake3 => hex::encode(blake3::hash(data).as_bytes()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha224" => Ok(HashAlgorithm::Sha224),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(CoreError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// A content-addressed blob reference.
///
/// Two blobs with identical bytes always yield identical references.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlobRef(String);

impl BlobRef {
    /// Compute the reference of `data` with the given algorithm.
    pub fn compute(algorithm: HashAlgorithm, data: &[u8]) -> Self {
        Self(format!("{}-{}", algorithm.prefix(), algorithm.digest_hex(data)))
    }

    /// The algorithm half of the reference.
    pub fn algorithm(&self) -> HashAlgorithm {
        // Validated on construction.
        let (prefix, _) = self.split();
        prefix.parse().unwrap_or_default()
    }

    /// The hex digest half of the reference.
    pub fn digest(&self) -> &str {
        self.split().1
    }

    /// The full reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `data` hashes to this reference.
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::compute(self.algorithm(), data) == *self
    }

    fn split(&self) -> (&str, &str) {
        self.0.split_once('-').unwrap_or((self.0.as_str(), ""))
    }
}

/// Compute the reference of `data` with the default algorithm.
pub fn compute_reference(data: &[u8]) -> BlobRef {
    BlobRef::compute(HashAlgorithm::default(), data)
}

impl FromStr for BlobRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, digest) = s
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidReference(s.to_string()))?;
        let algorithm: HashAlgorithm = prefix.parse()?;

        if digest.len() != algorithm.hex_len() {
            return Err(CoreError::InvalidReference(s.to_string()));
        }
        if !digest
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(CoreError::InvalidReference(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for BlobRef {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BlobRef> for String {
    fn from(r: BlobRef) -> Self {
        r.0
    }
}

impl AsRef<str> for BlobRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobRef({})", self.0)
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sha1_known_value() {
        let r = compute_reference(b"Hello");
        assert_eq!(r.as_str(), "sha1-f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0");
        assert_eq!(r.algorithm(), HashAlgorithm::Sha1);
        assert_eq!(r.digest(), "f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0");
    }

    #[test]
    fn test_empty_input() {
        let r = compute_reference(b"");
        assert_eq!(r.as_str(), "sha1-da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn test_other_algorithms() {
        let r = BlobRef::compute(HashAlgorithm::Sha224, b"");
        assert_eq!(
            r.as_str(),
            "sha224-d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );

        let b = BlobRef::compute(HashAlgorithm::Blake3, b"abc");
        assert!(b.as_str().starts_with("blake3-"));
        assert_eq!(b.digest().len(), 64);
        assert!(b.matches(b"abc"));
        assert!(!b.matches(b"abd"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("sha1".parse::<BlobRef>().is_err());
        assert!("md5-d41d8cd98f00b204e9800998ecf8427e".parse::<BlobRef>().is_err());
        assert!("sha1-abc".parse::<BlobRef>().is_err());
        assert!("sha1-F7FF9E8B7BB2E09B70935A5D785E0CC5D9D0ABF0"
            .parse::<BlobRef>()
            .is_err());
        assert!("sha1-f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0"
            .parse::<BlobRef>()
            .is_ok());
    }

    #[test]
    fn test_serde_as_string() {
        let r = compute_reference(b"Hello");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"sha1-f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0\"");
        let back: BlobRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);

        assert!(serde_json::from_str::<BlobRef>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn reference_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(compute_reference(&data), compute_reference(&data));
        }

        #[test]
        fn different_bytes_different_reference(
            a in prop::collection::vec(any::<u8>(), 0..64),
            b in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(compute_reference(&a), compute_reference(&b));
        }

        #[test]
        fn display_parses_back(data in prop::collection::vec(any::<u8>(), 0..64)) {
            let r = compute_reference(&data);
            let parsed: BlobRef = r.to_string().parse().unwrap();
            prop_assert_eq!(parsed, r);
        }
    }
}
