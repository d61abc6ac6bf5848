use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identifier of a remote item.
///
/// Ids are decimal snowflakes assigned in creation order. Two ids compare by
/// their significant digits: a shorter id is older, ids of equal length
/// compare lexicographically. Plain string comparison would put `"9"` after
/// `"10"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }

    /// True when `self` was created strictly after `other`.
    pub fn is_newer_than(&self, other: &ItemId) -> bool {
        self > other
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ItemId {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for ItemId {}

impl Hash for ItemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_id_is_newer() {
        assert!(ItemId::from("10") > ItemId::from("9"));
        assert!(ItemId::from("1800000000000000000") > ItemId::from("999999999999999999"));
    }

    #[test]
    fn test_equal_length_compares_lexicographically() {
        assert!(ItemId::from("1234") < ItemId::from("1235"));
        assert_eq!(
            ItemId::from("42").cmp(&ItemId::from("42")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_leading_zeros_are_not_significant() {
        assert_eq!(ItemId::from("007"), ItemId::from("7"));
        assert!(ItemId::from("0010") > ItemId::from("9"));
    }

    #[test]
    fn test_max_picks_newest() {
        let ids: Vec<ItemId> = ["8", "10", "9"].into_iter().map(ItemId::from).collect();
        assert_eq!(ids.iter().max().unwrap().as_str(), "10");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ItemId::from("123")).unwrap();
        assert_eq!(json, "\"123\"");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemId::from("123"));
    }
}
