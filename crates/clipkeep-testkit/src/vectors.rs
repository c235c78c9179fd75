//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the reference format and the canonical JSON layout. A
//! server only accepts signed objects whose text matches the layout exactly,
//! so any drift here is a wire break.

use chrono::{TimeZone, Utc};
use clipkeep_core::{
    attr, canonical_json, BlobRef, Claim, ClaimType, HashAlgorithm, Permanode, SchemaObject,
};

/// A known digest.
#[derive(Debug, Clone)]
pub struct DigestVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub algorithm: HashAlgorithm,
    pub input: &'static [u8],
    /// Expected reference text.
    pub expected: &'static str,
}

/// A schema object with its expected canonical text and reference.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    pub name: &'static str,
    pub object: SchemaObject,
    pub expected_text: &'static str,
    /// Expected sha1 reference of `expected_text`.
    pub expected_ref: &'static str,
}

/// Key reference the canonical vectors are signed with (`sha1("owner key")`).
pub const OWNER_KEY: &str = "sha1-bc8639caf77a0e06b93a14e936e24c9a73eccfe8";

/// Reference of the permanode vector, targeted by the claim vector.
pub const PERMANODE_REF: &str = "sha1-50b526aaa4d9d42620dd4263d84ddd69cf792bab";

/// Get all digest vectors.
pub fn all_digest_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "sha1 empty",
            algorithm: HashAlgorithm::Sha1,
            input: b"",
            expected: "sha1-da39a3ee5e6b4b0d3255bfef95601890afd80709",
        },
        DigestVector {
            name: "sha1 Hello",
            algorithm: HashAlgorithm::Sha1,
            input: b"Hello",
            expected: "sha1-f7ff9e8b7bb2e09b70935a5d785e0cc5d9d0abf0",
        },
        DigestVector {
            name: "sha1 PNG signature",
            algorithm: HashAlgorithm::Sha1,
            input: b"\x89PNG\r\n\x1a\n",
            expected: "sha1-4caece539b039b16e16206ea2478f8c5ffb2ca05",
        },
        DigestVector {
            name: "sha224 empty",
            algorithm: HashAlgorithm::Sha224,
            input: b"",
            expected: "sha224-d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
        },
        DigestVector {
            name: "sha224 Hello",
            algorithm: HashAlgorithm::Sha224,
            input: b"Hello",
            expected: "sha224-4149da18aa8bfc2b1e382c6c26556d01a92c261b6436dad5e3be3fcc",
        },
        DigestVector {
            name: "blake3 empty",
            algorithm: HashAlgorithm::Blake3,
            input: b"",
            expected: "blake3-af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
        },
    ]
}

/// Get all canonical JSON vectors.
pub fn all_canonical_vectors() -> Vec<CanonicalVector> {
    let owner: BlobRef = OWNER_KEY.parse().expect("valid vector reference");
    let permanode_ref: BlobRef = PERMANODE_REF.parse().expect("valid vector reference");

    let mut permanode = SchemaObject::from(Permanode::with_random("r"));
    permanode.set_signer(owner.clone());

    let date = Utc
        .with_ymd_and_hms(2015, 3, 14, 9, 26, 53)
        .single()
        .expect("valid vector date");
    let mut claim = SchemaObject::from(Claim::new(
        permanode_ref,
        ClaimType::AddAttribute,
        attr::TAG,
        "cats",
        date,
    ));
    claim.set_signer(owner);

    vec![
        CanonicalVector {
            name: "permanode",
            object: permanode,
            expected_text: "{\"camliVersion\":1,\n    \"camliType\": \"permanode\",\n    \"random\": \"r\",\n    \"camliSigner\": \"sha1-bc8639caf77a0e06b93a14e936e24c9a73eccfe8\"\n}",
            expected_ref: PERMANODE_REF,
        },
        CanonicalVector {
            name: "add-attribute tag claim",
            object: claim,
            expected_text: "{\"camliVersion\":1,\n    \"camliType\": \"claim\",\n    \"permaNode\": \"sha1-50b526aaa4d9d42620dd4263d84ddd69cf792bab\",\n    \"claimType\": \"add-attribute\",\n    \"claimDate\": \"2015-03-14T09:26:53.000Z\",\n    \"attribute\": \"tag\",\n    \"value\": \"cats\",\n    \"camliSigner\": \"sha1-bc8639caf77a0e06b93a14e936e24c9a73eccfe8\"\n}",
            expected_ref: "sha1-c36f616f21d0289bca0879c0e758031b458ef411",
        },
    ]
}

/// Verify every vector, returning `(name, matches, produced)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let digests = all_digest_vectors().into_iter().map(|v| {
        let got = BlobRef::compute(v.algorithm, v.input).to_string();
        (v.name.to_string(), got == v.expected, got)
    });

    let canonical = all_canonical_vectors().into_iter().map(|v| {
        let text = canonical_json(&v.object).unwrap_or_default();
        let reference = BlobRef::compute(HashAlgorithm::Sha1, text.as_bytes()).to_string();
        let matches = text == v.expected_text && reference == v.expected_ref;
        (v.name.to_string(), matches, reference)
    });

    digests.chain(canonical).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_key_matches_fixture() {
        assert_eq!(crate::fixtures::TestFixture::owner_key().as_str(), OWNER_KEY);
    }

    #[test]
    fn test_vectors_are_deterministic() {
        for vector in all_canonical_vectors() {
            let a = canonical_json(&vector.object).unwrap();
            let b = canonical_json(&vector.object).unwrap();
            assert_eq!(a, b, "vector '{}' is not deterministic", vector.name);
        }
    }
}
