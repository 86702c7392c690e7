//! Counting dated level-2 headings across a mirrored tree.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::Node;

/// `YYYY-MM-DD` at the start of the text, years 2000-2099. Trailing text is ignored.
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^20[0-9]{2}-[01][0-9]-[0-3][0-9]").expect("date pattern is valid"));

/// Occurrences of each date string among heading texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateCounts(BTreeMap<String, u64>);

impl DateCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` occurrences of `date`.
    pub fn add(&mut self, date: &str, n: u64) {
        *self.0.entry(date.to_string()).or_insert(0) += n;
    }

    /// Sum another result into this one, key by key.
    pub fn merge(&mut self, other: DateCounts) {
        for (date, n) in other.0 {
            *self.0.entry(date).or_insert(0) += n;
        }
    }

    pub fn get(&self, date: &str) -> u64 {
        self.0.get(date).copied().unwrap_or(0)
    }

    /// Number of distinct dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total matched headings.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// `(date, count)` pairs in ascending date order.
    pub fn to_pairs(&self) -> Vec<(String, u64)> {
        self.0.iter().map(|(d, n)| (d.clone(), *n)).collect()
    }

    /// SHA-256 over the ordered pairs, hex encoded.
    ///
    /// Equal counts always give equal fingerprints, so clients can skip
    /// re-rendering an unchanged heat map.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (date, n) in &self.0 {
            hasher.update(date.as_bytes());
            hasher.update(b"=");
            hasher.update(n.to_string().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Extract the leading date of a heading text, if any.
pub fn match_date(text: &str) -> Option<&str> {
    DATE_PREFIX.find(text).map(|m| m.as_str())
}

/// Count dated headings in `nodes` at any depth.
///
/// Children of a heading are not visited: a heading is assumed not to
/// contain nested headings.
pub fn aggregate(nodes: &[Node]) -> DateCounts {
    let mut counts = DateCounts::new();
    for node in nodes {
        if node.is_heading() {
            if let Some(date) = node.heading_text().and_then(match_date) {
                counts.add(date, 1);
            }
        } else if node.has_children {
            counts.merge(aggregate(&node.children));
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use chrono::{DateTime, Utc};

    fn t() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    fn headings(texts: &[&str]) -> Vec<Node> {
        texts.iter().enumerate().map(|(i, text)| Node::heading(format!("h{}", i), t(), *text)).collect()
    }

    #[test]
    fn test_match_date() {
        assert_eq!(match_date("2023-05-01 Review"), Some("2023-05-01"));
        assert_eq!(match_date("2023-05-01"), Some("2023-05-01"));
        assert_eq!(match_date("2023-5-1 Review"), None);
        assert_eq!(match_date("1999-05-01"), None);
        assert_eq!(match_date("Review 2023-05-01"), None);
        assert_eq!(match_date("2023-19-39"), Some("2023-19-39"));
        assert_eq!(match_date("２０２３-05-01"), None);
        assert_eq!(match_date(""), None);
    }

    #[test]
    fn test_prefix_match_ignores_trailing_text() {
        let counts = aggregate(&headings(&["2023-05-01 Review", "2023-5-1 Review", "2023-05-01 extra"]));
        assert_eq!(counts.to_pairs(), vec![("2023-05-01".to_string(), 2)]);
    }

    #[test]
    fn test_nested_heading_under_heading_is_skipped() {
        let mut a = Node::heading("a", t(), "2024-01-01");
        a.has_children = true;
        a.children = vec![Node::heading("b", t(), "2024-01-02")];

        let counts = aggregate(&[a]);
        assert_eq!(counts.to_pairs(), vec![("2024-01-01".to_string(), 1)]);
    }

    #[test]
    fn test_descends_through_non_headings() {
        let tree = vec![
            Node::block("col", t(), "column_list").with_children(vec![
                Node::block("c1", t(), "column").with_children(headings(&["2024-03-01", "2024-03-02"])),
                Node::block("c2", t(), "column").with_children(headings(&["2024-03-01 again"])),
            ]),
            Node::heading("top", t(), "2024-03-02 top"),
        ];

        let counts = aggregate(&tree);
        assert_eq!(counts.get("2024-03-01"), 2);
        assert_eq!(counts.get("2024-03-02"), 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_missing_text_contributes_nothing() {
        let mut untitled = Node::heading("x", t(), "");
        untitled.kind = NodeKind::Heading2 { text: None };
        let counts = aggregate(&[untitled, Node::heading("y", t(), "")]);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_unexpanded_children_are_ignored() {
        let mut toggle = Node::block("t", t(), "toggle");
        toggle.has_children = true;
        assert!(aggregate(&[toggle]).is_empty());
    }

    #[test]
    fn test_aggregate_of_concatenation_equals_merge() {
        let left = headings(&["2024-01-01", "2024-01-02", "nope"]);
        let right = vec![Node::block("w", t(), "toggle").with_children(headings(&["2024-01-02", "2024-01-03"]))];

        let mut merged = aggregate(&left);
        merged.merge(aggregate(&right));

        let mut both = left.clone();
        both.extend(right);
        assert_eq!(aggregate(&both), merged);
    }

    #[test]
    fn test_merge_is_associative() {
        let a = aggregate(&headings(&["2024-01-01"]));
        let b = aggregate(&headings(&["2024-01-01", "2024-01-02"]));
        let c = aggregate(&headings(&["2024-01-03"]));

        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut bc = b;
        bc.merge(c);
        let mut right = a;
        right.merge(bc);

        assert_eq!(left, right);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = aggregate(&headings(&["2024-01-01", "2024-01-02"]));
        let b = aggregate(&headings(&["2024-01-02", "2024-01-01"]));
        let c = aggregate(&headings(&["2024-01-02"]));

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_serializes_as_pairs() {
        let counts = aggregate(&headings(&["2024-01-02", "2024-01-01", "2024-01-02"]));
        let json = serde_json::to_string(&counts.to_pairs()).unwrap();
        assert_eq!(json, r#"[["2024-01-01",1],["2024-01-02",2]]"#);
    }
}
