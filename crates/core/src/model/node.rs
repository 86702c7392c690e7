//! Content blocks as mirrored from the document service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates the block kinds the aggregator cares about.
///
/// Only second-level headings carry text; every other block type is kept
/// by name so logs stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A level-2 heading. `text` is the plain text of its first rich-text run.
    Heading2 { text: Option<String> },
    /// Any other block type (`paragraph`, `toggle`, `column_list`, ...).
    Other { block_type: String },
}

/// A single content block.
///
/// `children` is populated only when `has_children` is set and the subtree
/// was fetched; it is then a complete, order-preserving copy of the subtree
/// at fetch time. Partial subtrees are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub last_modified: DateTime<Utc>,
    pub has_children: bool,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a level-2 heading block.
    pub fn heading(id: impl Into<String>, last_modified: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_modified,
            has_children: false,
            kind: NodeKind::Heading2 { text: Some(text.into()) },
            children: Vec::new(),
        }
    }

    /// Create a non-heading block of the given type.
    pub fn block(id: impl Into<String>, last_modified: DateTime<Utc>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_modified,
            has_children: false,
            kind: NodeKind::Other { block_type: block_type.into() },
            children: Vec::new(),
        }
    }

    /// Attach children and mark the node as having them.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.kind, NodeKind::Heading2 { .. })
    }

    /// Heading text, if this is a heading with a non-empty first run.
    pub fn heading_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Heading2 { text } => text.as_deref().filter(|t| !t.is_empty()),
            NodeKind::Other { .. } => None,
        }
    }

    /// The same node with its fetched subtree dropped, as the store returns it.
    pub fn shallow(&self) -> Self {
        Self { children: Vec::new(), ..self.clone() }
    }
}

/// One page of immediate children returned by a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildPage {
    pub results: Vec<Node>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}
