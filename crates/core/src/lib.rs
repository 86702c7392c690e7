//! Core types and shared functionality for datemark.
//!
//! This crate provides:
//! - The block tree model and the paginated document store contract
//! - The incrementally refreshed tree mirror and dated-heading aggregation
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod model;
pub mod tree;

pub use config::{AppConfig, ConfigError, Transport};
pub use error::Error;
pub use model::{ChildPage, Node, NodeKind};
pub use tree::{DateCounts, DocumentStore, MemoryStore, MirrorOptions, TreeMirror};
