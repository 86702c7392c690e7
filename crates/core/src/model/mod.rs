//! Block tree model shared by the store contract, the mirror and the aggregator.

mod node;

pub use node::{ChildPage, Node, NodeKind};
