//! date_headings / date_headings_refresh tool implementation.
//!
//! Counts level-2 headings that start with a `YYYY-MM-DD` date, grouped by date.

use datemark_core::{DateCounts, TreeMirror};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output structure for the date_headings tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DateHeadingsOutput {
    /// `[date, count]` pairs in ascending date order.
    pub counts: Vec<(String, u64)>,
    /// Number of matched headings.
    pub total: u64,
    /// SHA-256 of the counts; unchanged counts keep the same fingerprint.
    pub fingerprint: String,
    /// Top-level blocks the counts were taken over.
    pub cached_top_level: usize,
}

impl DateHeadingsOutput {
    pub fn new(counts: &DateCounts, cached_top_level: usize) -> Self {
        Self { counts: counts.to_pairs(), total: counts.total(), fingerprint: counts.fingerprint(), cached_top_level }
    }
}

/// Implementation of the date_headings tools.
///
/// With `rebuild` set the mirror is discarded and fetched again in full;
/// otherwise it is refreshed incrementally.
pub async fn date_headings_impl(mirror: &TreeMirror, rebuild: bool) -> Result<CallToolResult, McpError> {
    let (counts, top_level) = mirror.snapshot(rebuild).await?;

    let output = DateHeadingsOutput::new(&counts, top_level);

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use datemark_core::{Error, MemoryStore, MirrorOptions, Node};
    use std::sync::Arc;

    fn mirror(store: Arc<MemoryStore>) -> TreeMirror {
        TreeMirror::new(store, "root", MirrorOptions::default()).unwrap()
    }

    fn store() -> Arc<MemoryStore> {
        let t: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        Arc::new(MemoryStore::new(
            "root",
            vec![Node::heading("a", t, "2024-01-01 Mon"), Node::heading("b", t, "2024-01-01 Mon again")],
        ))
    }

    #[test]
    fn test_output_from_counts() {
        let mut counts = DateCounts::new();
        counts.add("2024-01-02", 3);
        counts.add("2024-01-01", 1);

        let output = DateHeadingsOutput::new(&counts, 7);
        assert_eq!(output.counts, vec![("2024-01-01".to_string(), 1), ("2024-01-02".to_string(), 3)]);
        assert_eq!(output.total, 4);
        assert_eq!(output.fingerprint, counts.fingerprint());
        assert_eq!(output.cached_top_level, 7);
    }

    #[tokio::test]
    async fn test_date_headings_success() {
        let store = store();
        let mirror = mirror(store);

        let result = date_headings_impl(&mirror, false).await.unwrap();
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        let output: DateHeadingsOutput = serde_json::from_str(text).unwrap();
        assert_eq!(output.counts, vec![("2024-01-01".to_string(), 2)]);
        assert_eq!(output.cached_top_level, 2);

        assert!(date_headings_impl(&mirror, true).await.is_ok());
        assert_eq!(mirror.cached_len().await, Some(2));
    }

    #[tokio::test]
    async fn test_date_headings_store_error() {
        let store = store();
        store.fail_with(Some(Error::StoreAuth("invalid token".into())));
        let mirror = mirror(store);

        let result = date_headings_impl(&mirror, false).await;
        assert!(matches!(result, Err(e) if e.code.0 == -32009));
    }
}
