//! A node struct used in the ID3 algorithm.
use serde::{Serialize, Serializer, Deserialize, Deserializer};

use std::fmt;
use std::sync::OnceLock;

use crate::sample::{Dataset, Example, Value};
use crate::schema::{AttrId, Schema, ValueId};


/// Position of a node in its tree.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
pub struct NodeId(pub usize);


/// The predicate on the edge from a parent to a child.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Branch {
    /// Discrete attribute equals `value`.
    Equals {
        attribute: AttrId,
        value:     ValueId,
    },
    /// Continuous attribute is `<= threshold`.
    AtMost {
        attribute: AttrId,
        threshold: f64,
    },
    /// Continuous attribute is `> threshold`.
    Above {
        attribute: AttrId,
        threshold: f64,
    },
}

impl Branch {
    pub fn attribute(&self) -> AttrId {
        match self {
            Self::Equals { attribute, .. }
            | Self::AtMost { attribute, .. }
            | Self::Above  { attribute, .. } => *attribute,
        }
    }

    /// Returns `true` if `example` follows this branch.
    pub fn matches(&self, example: &Example) -> bool {
        match (*self, example.value(self.attribute())) {
            (Self::Equals { value, .. }, Value::Discrete(v)) => v == value,
            (Self::AtMost { threshold, .. }, Value::Continuous(x)) => {
                x <= threshold
            },
            (Self::Above { threshold, .. }, Value::Continuous(x)) => {
                x > threshold
            },
            _ => false,
        }
    }

    /// Renders the branch as `name:value`, `name:<= t`, or `name:> t`.
    pub fn display<'a>(&'a self, schema: &'a Schema) -> impl fmt::Display + 'a {
        BranchLabel { branch: self, schema, }
    }
}

struct BranchLabel<'a> {
    branch: &'a Branch,
    schema: &'a Schema,
}

impl fmt::Display for BranchLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = &self.schema[self.branch.attribute()];
        match self.branch {
            Branch::Equals { value, .. } => {
                write!(f, "{}:{}", attr.name(), attr.label(*value))
            },
            Branch::AtMost { threshold, .. } => {
                write!(f, "{}:<= {threshold}", attr.name())
            },
            Branch::Above { threshold, .. } => {
                write!(f, "{}:> {threshold}", attr.name())
            },
        }
    }
}


/// Leaf or internal node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf,
    Internal {
        /// The attribute the children are split on.
        attribute: AttrId,
        /// The threshold of a continuous split.
        threshold: Option<f64>,
        children:  Vec<NodeId>,
    },
}


/// A node of a [`DTree`](crate::DTree).
///
/// The parent link is an index into the owning tree,
/// so a child never owns its parent.
///
/// The training subset is not serialized; a deserialized node
/// holds an empty dataset and keeps its resolved classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DNode {
    #[serde(skip)]
    pub(crate) data:       Dataset,
    pub(crate) attributes: Vec<AttrId>,
    pub(crate) branch:     Option<Branch>,
    pub(crate) parent:     Option<NodeId>,
    pub(crate) depth:      usize,
    pub(crate) kind:       NodeKind,
    #[serde(with = "memo")]
    pub(crate) classification: OnceLock<ValueId>,
}


/// Stores a memo cell as an optional value.
mod memo {
    use super::*;

    pub(super) fn serialize<S>(cell: &OnceLock<ValueId>, serializer: S)
        -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        cell.get().serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D)
        -> Result<OnceLock<ValueId>, D::Error>
        where D: Deserializer<'de>
    {
        let cell = OnceLock::new();
        if let Some(value) = Option::<ValueId>::deserialize(deserializer)? {
            cell.get_or_init(|| value);
        }
        Ok(cell)
    }
}

impl DNode {
    pub(crate) fn new(
        data:       Dataset,
        attributes: Vec<AttrId>,
        branch:     Option<Branch>,
        parent:     Option<NodeId>,
        depth:      usize,
    ) -> Self
    {
        Self {
            data,
            attributes,
            branch,
            parent,
            depth,
            kind: NodeKind::Leaf,
            classification: OnceLock::new(),
        }
    }

    /// The training examples that reached this node.
    /// Empty for a deserialized tree.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Candidate attributes left for this node's subtree.
    pub fn attributes(&self) -> &[AttrId] {
        &self.attributes[..]
    }

    /// The branch that leads here. `None` for the root.
    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The root has depth `0`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Internal { children, .. } => &children[..],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }
}
