use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use log::{debug, info, trace, warn};

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Id3Error, Result};
use crate::report::Accuracy;
use crate::sample::{Dataset, Example, Value};
use crate::schema::{AttrId, Schema, ValueId};
use crate::split::{find_split_attribute, information_gain};
use super::node::*;


/// A decision tree induced by the ID3 algorithm.
///
/// Nodes live in an arena owned by the tree; the root is always
/// [`DTree::root`]. The tree is built once by [`DTree::build`]
/// (or [`DTreeBuilder`](crate::DTreeBuilder)) and never changes
/// afterwards, except that node classifications are computed lazily
/// and cached.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use id3tree::{SchemaReader, DatasetReader, DTreeBuilder};
///
/// let schema = SchemaReader::default()
///     .file("/path/to/weather.attr")
///     .read()
///     .unwrap();
/// let schema = Arc::new(schema);
/// let train = DatasetReader::default()
///     .file("/path/to/weather.train")
///     .schema(Arc::clone(&schema))
///     .read()
///     .unwrap();
/// let test = DatasetReader::default()
///     .file("/path/to/weather.test")
///     .schema(Arc::clone(&schema))
///     .read()
///     .unwrap();
///
/// let tree = DTreeBuilder::new(&train)
///     .classifier("Play")
///     .build()
///     .unwrap();
///
/// println!("{tree}");
/// let correct = tree.test(tree.classifier(), &test);
/// println!("{correct} / {} correct", test.len());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DTree {
    schema:     Arc<Schema>,
    classifier: AttrId,
    attributes: Vec<AttrId>,
    nodes:      Vec<DNode>,
}

/// A node waiting to be grown.
struct Pending {
    data:       Dataset,
    attributes: Vec<AttrId>,
    branch:     Option<Branch>,
    parent:     Option<NodeId>,
}


impl DTree {
    /// Induce a tree predicting `classifier` from `training`,
    /// splitting on `attributes`.
    ///
    /// The candidate attributes are sorted by name first;
    /// the order decides between equally good splits.
    pub fn build(
        classifier: AttrId,
        training:   Dataset,
        attributes: &[AttrId],
    ) -> Result<Self>
    {
        let schema = Arc::clone(training.schema());

        let name = schema[classifier].name().to_string();
        if schema[classifier].is_continuous() {
            return Err(Id3Error::ContinuousClassifier(name));
        }
        if attributes.contains(&classifier) {
            return Err(Id3Error::ClassifierAsCandidate(name));
        }
        if training.is_empty() {
            return Err(Id3Error::EmptyTrainingSet);
        }

        let attributes = schema.sorted_by_name(attributes);
        let mut tree = Self {
            schema,
            classifier,
            attributes: attributes.clone(),
            nodes: Vec::new(),
        };
        tree.grow(training, attributes);

        // Resolve every node so that a serialized tree
        // does not need the training subsets.
        for id in 0..tree.nodes.len() {
            tree.classification(NodeId(id));
        }

        info!(
            "Built a tree predicting `{}`: {} nodes, {} leaves, depth {}",
            tree.schema[classifier].name(),
            tree.nodes.len(),
            tree.n_leaves(),
            tree.depth(),
        );
        Ok(tree)
    }

    /// Grow the tree depth-first from `data`.
    /// Children are pushed in reverse, so nodes are numbered in
    /// pre-order and each child follows its parent.
    fn grow(&mut self, data: Dataset, attributes: Vec<AttrId>) {
        let mut stack = vec![
            Pending { data, attributes, branch: None, parent: None, }
        ];

        while let Some(pending) = stack.pop() {
            let id = self.push_node(pending);
            let node = &self.nodes[id.0];

            if node.data.is_empty() {
                // Only children can be empty; the root holds every example.
                assert!(
                    node.parent.is_some(),
                    "The root node must hold training examples"
                );
                self.make_leaf(id);
                continue;
            }
            if node.data.is_well_classified(self.classifier)
                || node.attributes.is_empty()
            {
                self.make_leaf(id);
                continue;
            }

            let Some(split) = find_split_attribute(
                &node.data, &node.attributes, self.classifier
            ) else {
                warn!(
                    "No remaining attribute can split {} examples at depth {}",
                    node.data.len(), node.depth,
                );
                self.make_leaf(id);
                continue;
            };

            debug!(
                "Split on `{}` at depth {}: entropy {:.4}, gain {:.4}",
                self.schema[split.attribute].name(),
                node.depth,
                split.entropy,
                information_gain(node.data.entropy(self.classifier), split.entropy),
            );

            let (children, threshold) = match split.index {
                None => self.split_discrete(id, split.attribute),
                Some(index) => self.split_continuous(id, split.attribute, index),
            };

            self.nodes[id.0].kind = NodeKind::Internal {
                attribute: split.attribute,
                threshold,
                children: Vec::with_capacity(children.len()),
            };
            stack.extend(children.into_iter().rev());
        }
    }

    /// Append a node and register it with its parent.
    fn push_node(&mut self, pending: Pending) -> NodeId {
        let Pending { data, attributes, branch, parent, } = pending;
        let id = NodeId(self.nodes.len());
        let depth = parent.map_or(0, |p| self.nodes[p.0].depth + 1);
        self.nodes.push(DNode::new(data, attributes, branch, parent, depth));

        if let Some(parent) = parent {
            match &mut self.nodes[parent.0].kind {
                NodeKind::Internal { children, .. } => children.push(id),
                NodeKind::Leaf => {
                    panic!("Node {} is a leaf and cannot have children", parent.0)
                },
            }
        }
        id
    }

    /// One child per legal value, ordered by value label.
    /// The split attribute is not a candidate below this node.
    fn split_discrete(&self, id: NodeId, attribute: AttrId)
        -> (Vec<Pending>, Option<f64>)
    {
        let node = &self.nodes[id.0];
        let child_attributes = node.attributes.iter()
            .copied()
            .filter(|&a| a != attribute)
            .collect::<Vec<_>>();

        let mut subsets = node.data.subset_discrete(attribute);
        let attr = &self.schema[attribute];
        subsets.sort_by(|(a, _), (b, _)| attr.label(*a).cmp(attr.label(*b)));

        let children = subsets.into_iter()
            .map(|(value, data)| Pending {
                data,
                attributes: child_attributes.clone(),
                branch: Some(Branch::Equals { attribute, value, }),
                parent: Some(id),
            })
            .collect::<Vec<_>>();
        (children, None)
    }

    /// Two children split at the sorted position `index`.
    /// A continuous attribute stays a candidate below this node.
    fn split_continuous(&self, id: NodeId, attribute: AttrId, index: usize)
        -> (Vec<Pending>, Option<f64>)
    {
        let node = &self.nodes[id.0];
        let (left, right) = node.data.split_at_boundary(attribute, index);
        let threshold = left[index].number(attribute);

        let children = vec![
            Pending {
                data: left,
                attributes: node.attributes.clone(),
                branch: Some(Branch::AtMost { attribute, threshold, }),
                parent: Some(id),
            },
            Pending {
                data: right,
                attributes: node.attributes.clone(),
                branch: Some(Branch::Above { attribute, threshold, }),
                parent: Some(id),
            },
        ];
        (children, Some(threshold))
    }

    fn make_leaf(&self, id: NodeId) {
        let class = self.classification(id);
        trace!(
            "Leaf at depth {} classified as `{}`",
            self.nodes[id.0].depth,
            self.schema[self.classifier].label(class),
        );
    }

    /// The classification of node `id`.
    ///
    /// Computed on the first call and cached:
    /// the majority value of the node's training examples;
    /// on an empty node or a tied majority, the parent's classification;
    /// at the root, a tie goes to the first value in label order.
    /// Every node on the way up to the deciding ancestor is cached too.
    pub fn classification(&self, id: NodeId) -> ValueId {
        if let Some(&value) = self.nodes[id.0].classification.get() {
            return value;
        }

        let mut path = Vec::new();
        let mut current = id;
        let value = loop {
            let node = &self.nodes[current.0];
            if let Some(&value) = node.classification.get() {
                break value;
            }
            path.push(current);
            if let Some(value) = node.data.majority(self.classifier, false) {
                break value;
            }
            match node.parent {
                Some(parent) => {
                    trace!("Node {} falls back to its parent", current.0);
                    current = parent;
                },
                None => {
                    break node.data.majority(self.classifier, true)
                        .unwrap_or_else(|| {
                            panic!("The root node must hold training examples")
                        });
                },
            }
        };

        for id in path {
            self.nodes[id.0].classification.get_or_init(|| value);
        }
        value
    }

    /// Returns `1` if `example` is classified correctly by the subtree
    /// rooted at `node`, and `0` otherwise.
    /// An example that matches no branch counts as misclassified.
    pub fn evaluate(&self, classifier: AttrId, example: &Example, node: NodeId)
        -> usize
    {
        self.descend(example, node)
            .map_or(0, |leaf| {
                let class = Value::Discrete(self.classification(leaf));
                usize::from(example.value(classifier) == class)
            })
    }

    /// Returns the number of examples in `dataset` the tree
    /// classifies correctly.
    pub fn test(&self, classifier: AttrId, dataset: &Dataset) -> usize {
        if self.nodes.is_empty() { return 0; }

        let root = self.root();
        dataset.examples()
            .par_iter()
            .map(|example| self.evaluate(classifier, example, root))
            .sum::<usize>()
    }

    /// Correct count and dataset size, with respect to the classifier
    /// the tree was built for.
    pub fn accuracy(&self, dataset: &Dataset) -> Accuracy {
        let correct = self.test(self.classifier, dataset);
        Accuracy::new(correct, dataset.len())
    }

    /// The leaf `example` ends up in, if every branch on the way matches.
    pub fn leaf_of(&self, example: &Example) -> Option<NodeId> {
        self.descend(example, self.root())
    }

    /// Follow the matching branches from `id` down to a leaf.
    fn descend(&self, example: &Example, mut id: NodeId) -> Option<NodeId> {
        loop {
            let node = self.nodes.get(id.0)?;
            if node.is_leaf() { return Some(id); }

            id = *node.children()
                .iter()
                .find(|child| {
                    self.nodes[child.0].branch
                        .is_some_and(|branch| branch.matches(example))
                })?;
        }
    }

    /// Predicted classifier label for `example`.
    pub fn predict(&self, example: &Example) -> Option<&str> {
        self.leaf_of(example)
            .map(|leaf| {
                let class = self.classification(leaf);
                self.schema[self.classifier].label(class)
            })
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &DNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[DNode] {
        &self.nodes[..]
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn classifier(&self) -> AttrId {
        self.classifier
    }

    /// Candidate attributes sorted by name.
    pub fn attributes(&self) -> &[AttrId] {
        &self.attributes[..]
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.iter()
            .filter(|node| node.is_leaf())
            .count()
    }

    /// Depth of the deepest node; a single leaf has depth `0`.
    pub fn depth(&self) -> usize {
        self.nodes.iter()
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    /// Serialize the tree to JSON.
    /// Node classifications are kept, the training subsets are not.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a tree written by [`DTree::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: Self = serde_json::from_str(json)?;
        tree.check_structure()?;
        Ok(tree)
    }

    /// Every child must follow its parent and point back to it,
    /// and every node must carry its classification.
    fn check_structure(&self) -> Result<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.classification.get().is_none() {
                return Err(Id3Error::MalformedTree(
                    format!("node {i} has no classification")
                ));
            }
            for child in node.children() {
                let linked = child.0 > i
                    && self.nodes.get(child.0)
                        .is_some_and(|c| c.parent == Some(NodeId(i)));
                if !linked {
                    return Err(Id3Error::MalformedTree(
                        format!("node {} is not a child of node {i}", child.0)
                    ));
                }
            }
        }
        Ok(())
    }

    /// Write the tree in the Graphviz DOT format.
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut f = File::create(path)?;
        f.write_all(b"graph DecisionTree {\n")?;
        for row in self.to_dot_info() {
            f.write_all(row.as_bytes())?;
        }
        f.write_all(b"}\n")?;
        Ok(())
    }

    fn to_dot_info(&self) -> Vec<String> {
        let mut info = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            match &node.kind {
                NodeKind::Leaf => {
                    let class = self.schema[self.classifier]
                        .label(self.classification(NodeId(i)));
                    info.push(format!(
                        "\tnode_{i} [ label = \"{class}\", shape = box ];\n"
                    ));
                },
                NodeKind::Internal { attribute, children, .. } => {
                    let name = self.schema[*attribute].name();
                    info.push(format!(
                        "\tnode_{i} [ label = \"{name} ?\" ];\n"
                    ));
                    for &child in children {
                        let edge = match self.nodes[child.0].branch {
                            Some(Branch::Equals { attribute, value }) => {
                                self.schema[attribute].label(value).to_string()
                            },
                            Some(Branch::AtMost { threshold, .. }) => {
                                format!("<= {threshold}")
                            },
                            Some(Branch::Above { threshold, .. }) => {
                                format!("> {threshold}")
                            },
                            None => String::new(),
                        };
                        info.push(format!(
                            "\tnode_{i} -- node_{} [ label = \"{edge}\" ];\n",
                            child.0
                        ));
                    }
                },
            }
        }
        info
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            let class = || {
                self.schema[self.classifier].label(self.classification(id))
            };

            match node.branch {
                Some(branch) => {
                    let indent = " ".repeat(node.depth - 1);
                    writeln!(f, "{indent}{}", branch.display(&self.schema))?;
                    if node.is_leaf() {
                        writeln!(f, "{indent} <{}>", class())?;
                    }
                },
                None if node.is_leaf() => { writeln!(f, "<{}>", class())?; },
                None => {},
            }

            stack.extend(node.children().iter().rev());
        }
        Ok(())
    }
}

/// Structural dump of the tree: one line per branch label,
/// indented by depth, and `<class>` under every leaf.
impl fmt::Display for DTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() { return Ok(()); }
        self.dump(f)
    }
}
