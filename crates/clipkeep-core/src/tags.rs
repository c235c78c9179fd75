//! Comma-separated tag input.

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// A validated list of tags, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Parse user input such as `"cats, funny ,gif"`.
    ///
    /// Blank input yields no tags. Otherwise every comma-separated token is
    /// trimmed, and the whole input is rejected if any token ends up empty.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let tags: Vec<String> = input.split(',').map(|t| t.trim().to_string()).collect();
        if tags.iter().any(String::is_empty) {
            return Err(CoreError::InvalidTags(input.to_string()));
        }

        Ok(Self(tags))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromStr for TagList {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl IntoIterator for TagList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_three_tags() {
        let tags = TagList::parse("a,b,c").unwrap();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trims_tokens() {
        let tags = TagList::parse("  cats , funny pictures,gif ").unwrap();
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec!["cats", "funny pictures", "gif"]
        );
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(matches!(TagList::parse("a, ,b"), Err(CoreError::InvalidTags(_))));
        assert!(matches!(TagList::parse("a,"), Err(CoreError::InvalidTags(_))));
        assert!(matches!(TagList::parse(",a"), Err(CoreError::InvalidTags(_))));
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(TagList::parse("").unwrap().is_empty());
        assert!(TagList::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_display_joins() {
        let tags: TagList = " x , y".parse().unwrap();
        assert_eq!(tags.to_string(), "x,y");
    }

    proptest! {
        #[test]
        fn parse_keeps_count_and_order(tags in prop::collection::vec("[a-z][a-z0-9 ]{0,8}[a-z0-9]", 1..8)) {
            let input = tags.join(" , ");
            let parsed = TagList::parse(&input).unwrap();
            prop_assert_eq!(parsed.len(), tags.len());
            let expected: Vec<&str> = tags.iter().map(|t| t.trim()).collect();
            prop_assert_eq!(parsed.iter().collect::<Vec<_>>(), expected);
        }
    }
}
