//! Incrementally refreshed mirror of a remote block tree.
//!
//! - [`fetch_subtree`]: full recursive retrieval, draining pagination at every level
//! - [`find_changed_top_level`]: staleness-driven partial re-fetch of the top level
//! - [`reconcile`]: merging refreshed nodes into the cache and reindexing
//! - [`aggregate`]: counting dated level-2 headings
//! - [`TreeMirror`]: the owned cache and the query interface over it

mod aggregate;
mod fetcher;
mod mirror;
pub mod reconcile;
mod refresher;
mod staleness;
mod store;

pub use aggregate::{DateCounts, aggregate, match_date};
pub use fetcher::fetch_subtree;
pub use mirror::{MirrorOptions, TreeMirror};
pub use refresher::{RefreshOptions, find_changed_top_level};
pub use staleness::StalenessIndex;
pub use store::{DocumentStore, MAX_PAGE_SIZE, MemoryStore};
