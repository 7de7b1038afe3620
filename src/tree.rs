//! The ID3 decision tree.

pub mod node;
pub(crate) mod builder;
pub(crate) mod dtree;

pub use builder::DTreeBuilder;
pub use dtree::DTree;
pub use node::{Branch, DNode, NodeId, NodeKind};
