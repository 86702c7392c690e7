//! Staleness-driven partial re-fetch of the top level.
//!
//! Only the root's direct children are compared against the staleness index.
//! A changed node always gets its whole subtree re-fetched; nothing below the
//! top level is diffed, and blocks removed upstream are never detected.

use futures_util::{StreamExt, TryStreamExt, stream};

use crate::Error;
use crate::model::Node;
use crate::tree::fetcher::{Pages, expand};
use crate::tree::{DocumentStore, StalenessIndex};

/// Paging and concurrency knobs for a refresh scan.
#[derive(Debug, Clone, Copy)]
pub struct RefreshOptions {
    /// Page size used while scanning the top level.
    pub scan_page_size: u8,
    /// Page size used when re-fetching a changed node's subtree.
    pub fetch_page_size: u8,
    /// Upper bound on subtrees expanded at once within a page.
    pub max_concurrent_expansions: usize,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self { scan_page_size: 10, fetch_page_size: 100, max_concurrent_expansions: 10 }
    }
}

/// Find every top-level node under `root_id` that is new or modified since `index`.
///
/// Scans every page until the store reports no more; a page with no changes
/// does not end the scan. Changed nodes of one page are expanded concurrently
/// and the scan resumes once all of them are done. Results keep scan order.
pub async fn find_changed_top_level(
    store: &dyn DocumentStore, root_id: &str, index: &StalenessIndex, options: RefreshOptions,
) -> Result<Vec<Node>, Error> {
    let mut changed = Vec::new();
    let mut scanned = 0;
    let mut pages = Pages::new(store, root_id, options.scan_page_size);

    while let Some(page) = pages.next_page().await? {
        scanned += page.len();
        let stale: Vec<Node> = page.into_iter().filter(|n| index.is_stale(n)).collect();
        if stale.is_empty() {
            continue;
        }

        let expanded: Vec<Node> = stream::iter(stale)
            .map(|node| expand(store, node, options.fetch_page_size))
            .buffered(options.max_concurrent_expansions.max(1))
            .try_collect()
            .await?;
        changed.extend(expanded);
    }

    tracing::debug!(root_id, pages = pages.fetched, scanned, changed = changed.len(), "top-level scan complete");

    Ok(changed)
}
