//! Per-node modification timestamps recorded at the last fetch.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::Node;

/// Maps a top-level node id to the `last_modified` instant seen when it was cached.
///
/// Always rebuilt wholesale from the cache, so it covers exactly the cached
/// top-level ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StalenessIndex {
    seen: HashMap<String, DateTime<Utc>>,
}

impl StalenessIndex {
    /// Build the index from a cached top-level node list.
    pub fn rebuild(cache: &[Node]) -> Self {
        Self { seen: cache.iter().map(|n| (n.id.clone(), n.last_modified)).collect() }
    }

    /// True if `node` is new or strictly newer than what was recorded.
    pub fn is_stale(&self, node: &Node) -> bool {
        match self.seen.get(&node.id) {
            Some(recorded) => node.last_modified > *recorded,
            None => true,
        }
    }

    pub fn get(&self, id: &str) -> Option<DateTime<Utc>> {
        self.seen.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
