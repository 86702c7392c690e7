//! Client code for datemark.
//!
//! This crate provides the Notion API client that backs the tree mirror's
//! document store.

pub mod notion;

pub use notion::{ListChildrenRequest, NotionClient, NotionConfig, NotionError};
