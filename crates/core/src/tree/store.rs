//! The paginated document service contract, plus an in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Error;
use crate::model::{ChildPage, Node};

/// Largest page the document service hands out.
pub const MAX_PAGE_SIZE: u8 = 100;

/// The ability to list a block's immediate children, one page at a time.
///
/// The mirror depends on this trait, never on HTTP details. Implementations
/// own retry and timeout policy; the mirror propagates every error as-is.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List up to `page_size` children of `node_id`, continuing from `cursor`.
    ///
    /// Returned nodes carry no `children`; expansion is the caller's job.
    async fn list_children(&self, node_id: &str, page_size: u8, cursor: Option<&str>) -> Result<ChildPage, Error>;
}

/// A [`DocumentStore`] backed by a fixed tree held in memory.
///
/// Cursors are decimal offsets into a parent's child list. Useful for tests
/// and for exercising the mirror without network access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    children: Mutex<HashMap<String, Vec<Node>>>,
    requests: AtomicUsize,
    failure: Mutex<Option<Error>>,
}

impl MemoryStore {
    /// Build a store whose root `root_id` has the given (possibly nested) children.
    pub fn new(root_id: impl Into<String>, top_level: Vec<Node>) -> Self {
        let store = Self::default();
        {
            let mut map = store.lock_children();
            Self::insert_tree(&mut map, root_id.into(), top_level);
        }
        store
    }

    fn lock_children(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Node>>> {
        self.children.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert_tree(map: &mut HashMap<String, Vec<Node>>, parent: String, nodes: Vec<Node>) {
        let mut shallow = Vec::with_capacity(nodes.len());
        for mut node in nodes {
            let children = std::mem::take(&mut node.children);
            if node.has_children {
                Self::insert_tree(map, node.id.clone(), children);
            }
            shallow.push(node);
        }
        map.insert(parent, shallow);
    }

    /// Number of `list_children` calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Replace the children of `parent` (and their subtrees).
    pub fn set_children(&self, parent: impl Into<String>, nodes: Vec<Node>) {
        let mut map = self.lock_children();
        Self::insert_tree(&mut map, parent.into(), nodes);
    }

    /// Append a new child under `parent`.
    pub fn push_child(&self, parent: &str, node: Node) {
        let mut map = self.lock_children();
        let mut nested = HashMap::new();
        Self::insert_tree(&mut nested, parent.to_string(), vec![node]);
        let shallow = nested.remove(parent).unwrap_or_default();
        map.extend(nested);
        map.entry(parent.to_string()).or_default().extend(shallow);
    }

    /// Apply `edit` to the block with `id` wherever it appears and bump its timestamp.
    ///
    /// Returns false if no such block exists.
    pub fn touch(&self, id: &str, last_modified: DateTime<Utc>, edit: impl Fn(&mut Node)) -> bool {
        let mut map = self.lock_children();
        let mut found = false;
        for node in map.values_mut().flatten().filter(|n| n.id == id) {
            edit(node);
            node.last_modified = last_modified;
            found = true;
        }
        found
    }

    /// Make every subsequent request fail with `err` until cleared.
    pub fn fail_with(&self, err: Option<Error>) {
        *self.failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = err;
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_children(&self, node_id: &str, page_size: u8, cursor: Option<&str>) -> Result<ChildPage, Error> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone() {
            return Err(err);
        }

        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidInput(format!("page_size must be 1-{}", MAX_PAGE_SIZE)));
        }

        let start = match cursor {
            Some(c) => c.parse::<usize>().map_err(|_| Error::InvalidInput(format!("bad cursor: {}", c)))?,
            None => 0,
        };

        let map = self.lock_children();
        let all = map
            .get(node_id)
            .ok_or_else(|| Error::StoreNotFound(format!("block {} not found", node_id)))?;

        let end = start.saturating_add(page_size as usize).min(all.len());
        let results = all.get(start..end).map(<[Node]>::to_vec).unwrap_or_default();
        let has_more = end < all.len();

        Ok(ChildPage { results, next_cursor: has_more.then(|| end.to_string()), has_more })
    }
}
