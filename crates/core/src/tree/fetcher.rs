//! Full recursive subtree retrieval.
//!
//! Pages are drained at every level and children are expanded one at a time,
//! depth-first, in sibling order. No retries happen here.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::Error;
use crate::model::{ChildPage, Node};
use crate::tree::DocumentStore;

/// Walks the pages of one node's immediate children.
pub(crate) struct Pages<'a> {
    store: &'a dyn DocumentStore,
    node_id: &'a str,
    page_size: u8,
    cursor: Option<String>,
    done: bool,
    pub(crate) fetched: usize,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(store: &'a dyn DocumentStore, node_id: &'a str, page_size: u8) -> Self {
        Self { store, node_id, page_size, cursor: None, done: false, fetched: 0 }
    }

    /// The next page's nodes in arrival order, or `None` once the store has no more.
    pub(crate) async fn next_page(&mut self) -> Result<Option<Vec<Node>>, Error> {
        if self.done {
            return Ok(None);
        }

        let ChildPage { results, next_cursor, has_more } =
            self.store.list_children(self.node_id, self.page_size, self.cursor.as_deref()).await?;
        self.fetched += 1;

        tracing::debug!(
            node_id = self.node_id,
            page = self.fetched,
            results = results.len(),
            has_more,
            "fetched child page"
        );

        match (has_more, next_cursor) {
            (true, Some(next)) => self.cursor = Some(next),
            (true, None) => {
                tracing::warn!(node_id = self.node_id, "store reported more pages without a cursor; stopping");
                self.done = true;
            }
            (false, _) => self.done = true,
        }

        Ok(Some(results))
    }
}

/// Fetch the complete subtree below `node_id`.
///
/// Every returned node with `has_children` set carries its fully materialized
/// children. Any store error aborts the whole fetch.
pub fn fetch_subtree<'a>(
    store: &'a dyn DocumentStore, node_id: &'a str, page_size: u8,
) -> BoxFuture<'a, Result<Vec<Node>, Error>> {
    async move {
        let mut nodes = Vec::new();
        let mut pages = Pages::new(store, node_id, page_size);
        while let Some(page) = pages.next_page().await? {
            nodes.extend(page);
        }

        for node in nodes.iter_mut().filter(|n| n.has_children) {
            let children = fetch_subtree(store, &node.id, page_size).await?;
            node.children = children;
        }

        Ok(nodes)
    }
    .boxed()
}

/// Re-fetch `node`'s subtree if it has one.
pub(crate) async fn expand(store: &dyn DocumentStore, mut node: Node, page_size: u8) -> Result<Node, Error> {
    if node.has_children {
        node.children = fetch_subtree(store, &node.id, page_size).await?;
    }
    Ok(node)
}
