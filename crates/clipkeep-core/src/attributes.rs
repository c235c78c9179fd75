//! Permanode attribute state.
//!
//! A permanode has no state of its own. Its attributes are computed by
//! replaying the claims that target it in `claimDate` order:
//! `set-attribute` replaces every value of the key, `add-attribute` appends.

use std::collections::BTreeMap;

use crate::blobref::BlobRef;
use crate::schema::{Claim, ClaimType};

/// Attribute values folded from a permanode's claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermanodeState {
    permanode: BlobRef,
    attributes: BTreeMap<String, Vec<String>>,
}

impl PermanodeState {
    /// Create an empty state for `permanode`.
    pub fn new(permanode: BlobRef) -> Self {
        Self {
            permanode,
            attributes: BTreeMap::new(),
        }
    }

    /// Replay `claims` in date order. Claims for other permanodes are skipped.
    ///
    /// The sort is stable, so claims sharing a date apply in slice order.
    pub fn from_claims<'a, I>(permanode: BlobRef, claims: I) -> Self
    where
        I: IntoIterator<Item = &'a Claim>,
    {
        let mut ordered: Vec<&Claim> = claims
            .into_iter()
            .filter(|c| c.permanode == permanode)
            .collect();
        ordered.sort_by_key(|c| c.claim_date);

        let mut state = Self::new(permanode);
        for claim in ordered {
            state.apply(claim);
        }
        state
    }

    /// Apply one claim on top of the current state.
    pub fn apply(&mut self, claim: &Claim) {
        if claim.permanode != self.permanode {
            return;
        }

        let values = self.attributes.entry(claim.attribute.clone()).or_default();
        match claim.claim_type {
            ClaimType::SetAttribute => {
                values.clear();
                values.push(claim.value.clone());
            }
            ClaimType::AddAttribute => values.push(claim.value.clone()),
        }
    }

    pub fn permanode(&self) -> &BlobRef {
        &self.permanode
    }

    /// The most recent value of an attribute.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .get(attribute)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    /// Every value of an attribute, oldest first.
    pub fn values(&self, attribute: &str) -> &[String] {
        self.attributes
            .get(attribute)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Attribute names with at least one value.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blobref::compute_reference;
    use crate::schema::attr;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset)
    }

    #[test]
    fn test_last_set_wins_by_date() {
        let pn = compute_reference(b"pn");
        let claims = vec![
            Claim::new(pn.clone(), ClaimType::SetAttribute, attr::IMG_SRC, "second", t(2)),
            Claim::new(pn.clone(), ClaimType::SetAttribute, attr::IMG_SRC, "first", t(1)),
        ];

        let state = PermanodeState::from_claims(pn, &claims);
        assert_eq!(state.get(attr::IMG_SRC), Some("second"));
        assert_eq!(state.values(attr::IMG_SRC).len(), 1);
    }

    #[test]
    fn test_add_accumulates() {
        let pn = compute_reference(b"pn");
        let claims = vec![
            Claim::new(pn.clone(), ClaimType::AddAttribute, attr::TAG, "a", t(1)),
            Claim::new(pn.clone(), ClaimType::AddAttribute, attr::TAG, "b", t(2)),
            Claim::new(pn.clone(), ClaimType::AddAttribute, attr::TAG, "c", t(3)),
        ];

        let state = PermanodeState::from_claims(pn, &claims);
        assert_eq!(state.values(attr::TAG), ["a", "b", "c"]);
    }

    #[test]
    fn test_set_after_add_replaces() {
        let pn = compute_reference(b"pn");
        let claims = vec![
            Claim::new(pn.clone(), ClaimType::AddAttribute, attr::TAG, "a", t(1)),
            Claim::new(pn.clone(), ClaimType::AddAttribute, attr::TAG, "b", t(2)),
            Claim::new(pn.clone(), ClaimType::SetAttribute, attr::TAG, "only", t(3)),
        ];

        let state = PermanodeState::from_claims(pn, &claims);
        assert_eq!(state.values(attr::TAG), ["only"]);
    }

    #[test]
    fn test_other_permanodes_ignored() {
        let pn = compute_reference(b"pn");
        let other = compute_reference(b"other");
        let claims = vec![
            Claim::new(other, ClaimType::SetAttribute, attr::FOUND_AT, "x", t(1)),
            Claim::new(pn.clone(), ClaimType::SetAttribute, attr::CONTENT, "y", t(1)),
        ];

        let state = PermanodeState::from_claims(pn, &claims);
        assert_eq!(state.get(attr::FOUND_AT), None);
        assert_eq!(state.attribute_names().collect::<Vec<_>>(), vec![attr::CONTENT]);
        assert!(state.values("missing").is_empty());
    }
}
