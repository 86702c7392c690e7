//! Merging freshly fetched top-level nodes into the cached list.

use std::collections::HashSet;

use crate::model::Node;
use crate::tree::StalenessIndex;

/// Merge `changed` into `existing`.
///
/// Cached nodes sharing an id with a changed node are dropped; the result is
/// every changed node (in the order given) followed by the untouched cached
/// nodes (in cached order). Sibling order relative to the document is not
/// preserved across a refresh.
pub fn merge(existing: Vec<Node>, changed: Vec<Node>) -> Vec<Node> {
    let changed_ids: HashSet<&str> = changed.iter().map(|n| n.id.as_str()).collect();
    let kept: Vec<Node> = existing.into_iter().filter(|n| !changed_ids.contains(n.id.as_str())).collect();

    let mut merged = changed;
    merged.extend(kept);
    merged
}

/// Rebuild the staleness index from a merged cache.
pub fn rebuild_index(cache: &[Node]) -> StalenessIndex {
    StalenessIndex::rebuild(cache)
}
