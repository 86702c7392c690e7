//! The owned, process-lifetime mirror of one document's block tree.
//!
//! [`TreeMirror`] holds the cache and its staleness index behind one async
//! mutex. The lock is held for the whole fetch, merge and reindex sequence,
//! so overlapping refreshes run one after another instead of racing. A failed
//! or dropped query leaves the cache exactly as it was.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::Error;
use crate::model::Node;
use crate::tree::{
    DateCounts, DocumentStore, RefreshOptions, StalenessIndex, aggregate, fetch_subtree, find_changed_top_level,
    reconcile,
};

/// Paging and concurrency settings for a [`TreeMirror`].
#[derive(Debug, Clone, Copy)]
pub struct MirrorOptions {
    /// Page size for full subtree fetches.
    pub page_size: u8,
    /// Page size for the top-level staleness scan.
    pub refresh_page_size: u8,
    /// Bound on changed siblings expanded at once.
    pub max_concurrent_expansions: usize,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self { page_size: 100, refresh_page_size: 10, max_concurrent_expansions: 10 }
    }
}

impl MirrorOptions {
    fn refresh(&self) -> RefreshOptions {
        RefreshOptions {
            scan_page_size: self.refresh_page_size,
            fetch_page_size: self.page_size,
            max_concurrent_expansions: self.max_concurrent_expansions,
        }
    }
}

#[derive(Debug, Default)]
struct MirrorState {
    cache: Option<Vec<Node>>,
    index: StalenessIndex,
}

/// Cached copy of the children of one root block, plus the query interface over it.
pub struct TreeMirror {
    store: Arc<dyn DocumentStore>,
    root_id: String,
    options: MirrorOptions,
    state: Mutex<MirrorState>,
}

impl std::fmt::Debug for TreeMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeMirror").field("root_id", &self.root_id).field("options", &self.options).finish()
    }
}

impl TreeMirror {
    /// Create an empty mirror. Nothing is fetched until the first query.
    pub fn new(
        store: Arc<dyn DocumentStore>, root_id: impl Into<String>, options: MirrorOptions,
    ) -> Result<Self, Error> {
        let root_id = root_id.into();
        if root_id.trim().is_empty() {
            return Err(Error::InvalidInput("root id cannot be empty".into()));
        }
        for (field, size) in [("page_size", options.page_size), ("refresh_page_size", options.refresh_page_size)] {
            if !(1..=crate::tree::MAX_PAGE_SIZE).contains(&size) {
                return Err(Error::InvalidInput(format!("{} must be 1-{}", field, crate::tree::MAX_PAGE_SIZE)));
            }
        }

        Ok(Self { store, root_id, options, state: Mutex::new(MirrorState::default()) })
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Date counts over the mirror, bringing it up to date first.
    ///
    /// A cold mirror is filled with a full fetch. A warm one gets an
    /// incremental refresh: new or modified top-level nodes are re-fetched
    /// and merged in.
    pub async fn date_counts(&self) -> Result<DateCounts, Error> {
        self.snapshot(false).await.map(|(counts, _)| counts)
    }

    /// Discard the mirror, fetch the whole tree again and count.
    pub async fn refresh_date_counts(&self) -> Result<DateCounts, Error> {
        self.snapshot(true).await.map(|(counts, _)| counts)
    }

    /// Counts plus the number of top-level nodes they were taken over.
    ///
    /// Both values come from the same locked update. The cache is only
    /// replaced once every request has succeeded, so a failed or dropped
    /// query leaves it untouched.
    pub async fn snapshot(&self, rebuild: bool) -> Result<(DateCounts, usize), Error> {
        let mut state = self.state.lock().await;
        let start = Instant::now();

        let cache = if rebuild || state.cache.is_none() {
            if rebuild {
                tracing::info!(root_id = %self.root_id, "rebuilding mirror from scratch");
            } else {
                tracing::info!(root_id = %self.root_id, "mirror cold; fetching full tree");
            }
            let cache = fetch_subtree(self.store.as_ref(), &self.root_id, self.options.page_size).await?;
            tracing::info!(
                top_level = cache.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "full fetch done"
            );
            cache
        } else {
            let changed =
                find_changed_top_level(self.store.as_ref(), &self.root_id, &state.index, self.options.refresh())
                    .await?;
            let changed_ids: Vec<&str> = changed.iter().map(|n| n.id.as_str()).collect();
            tracing::info!(
                changed = ?changed_ids,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "mirror warm; merged changed top-level blocks"
            );
            reconcile::merge(state.cache.take().unwrap_or_default(), changed)
        };

        let top_level = cache.len();
        Ok((Self::install(&mut state, cache), top_level))
    }

    /// Number of cached top-level nodes, or `None` before the first fetch.
    pub async fn cached_len(&self) -> Option<usize> {
        self.state.lock().await.cache.as_ref().map(Vec::len)
    }

    pub async fn is_warm(&self) -> bool {
        self.state.lock().await.cache.is_some()
    }

    /// Recorded timestamp of a cached top-level node.
    pub async fn recorded_modified(&self, id: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        self.state.lock().await.index.get(id)
    }

    fn install(state: &mut MirrorState, cache: Vec<Node>) -> DateCounts {
        state.index = reconcile::rebuild_index(&cache);
        let counts = aggregate(&cache);
        state.cache = Some(cache);
        counts
    }
}
