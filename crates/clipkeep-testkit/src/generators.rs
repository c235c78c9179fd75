//! Proptest generators for property-based testing.

use proptest::prelude::*;

use clipkeep_core::HashAlgorithm;

/// Generate a hash algorithm.
pub fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![
        Just(HashAlgorithm::Sha1),
        Just(HashAlgorithm::Sha224),
        Just(HashAlgorithm::Blake3),
    ]
}

/// Generate a single valid tag: no commas, not blank after trimming.
pub fn tag() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 _-]{0,15}".prop_map(String::from)
}

/// Generate padding that trims away.
pub fn padding() -> impl Strategy<Value = String> {
    "[ \t]{0,3}".prop_map(String::from)
}

/// Generate comma-separated tag input with random padding around each tag.
///
/// Returns the raw input and the tags it should parse to.
pub fn tag_input(max_tags: usize) -> impl Strategy<Value = (String, Vec<String>)> {
    prop::collection::vec((padding(), tag(), padding()), 1..=max_tags).prop_map(|parts| {
        let raw = parts
            .iter()
            .map(|(l, t, r)| format!("{l}{t}{r}"))
            .collect::<Vec<_>>()
            .join(",");
        let tags = parts.into_iter().map(|(_, t, _)| t.trim().to_string()).collect();
        (raw, tags)
    })
}

/// Generate image-like bytes of at most `max_len` bytes.
pub fn image_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len)
}

/// Parameters for one clip.
#[derive(Debug, Clone)]
pub struct ClipParams {
    pub image: Vec<u8>,
    pub page_url: String,
    pub tags: (String, Vec<String>),
}

impl Arbitrary for ClipParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            image_bytes(256),
            "[a-z]{1,12}",
            prop_oneof![
                Just((String::new(), Vec::new())),
                tag_input(6),
            ],
        )
            .prop_map(|(image, host, tags)| ClipParams {
                image,
                page_url: format!("https://{host}.example.com/"),
                tags,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipkeep_core::{BlobRef, TagList};

    proptest! {
        #[test]
        fn test_tag_input_parses(input in tag_input(8)) {
            let (raw, expected) = input;
            let parsed = TagList::parse(&raw).unwrap();
            prop_assert_eq!(parsed.iter().collect::<Vec<_>>(), expected.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn test_empty_token_rejects_whole_input(input in tag_input(4), at in 0usize..5) {
            let (raw, _) = input;
            let mut parts: Vec<&str> = raw.split(',').collect();
            let at = at.min(parts.len());
            parts.insert(at, "  ");
            prop_assert!(TagList::parse(&parts.join(",")).is_err());
        }

        #[test]
        fn test_reference_roundtrips_through_text(alg in algorithm(), data in image_bytes(64)) {
            let reference = BlobRef::compute(alg, &data);
            let parsed: BlobRef = reference.as_str().parse().unwrap();
            prop_assert_eq!(parsed.algorithm(), alg);
            prop_assert_eq!(parsed, reference);
        }
    }
}
