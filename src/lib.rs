//!
//! A crate that induces decision trees with the ID3 algorithm.
//!
//! Attributes are either discrete, with a finite set of legal labels,
//! or continuous. A node is split on the attribute that minimizes the
//! conditional entropy of the classifier (equivalently, maximizes the
//! information gain).
//!
//! - Discrete attributes produce one child per legal label and are not
//!   used again below that node.
//! - Continuous attributes produce two children at the best threshold
//!   between adjacent distinct values, and may be split on again.
//!
//! A leaf is classified by the majority of its training examples.
//! Empty leaves, and leaves whose majority is tied, take the
//! classification of their parent.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use id3tree::{Attribute, Dataset, DTreeBuilder, Example, Schema};
//!
//! let schema = Arc::new(Schema::new(vec![
//!     Attribute::continuous("Temp"),
//!     Attribute::discrete("Outlook", ["Sunny", "Rain"]),
//!     Attribute::discrete("Play", ["Yes", "No"]),
//! ]).unwrap());
//!
//! let mut train = Dataset::new(Arc::clone(&schema));
//! for (line, row) in [
//!     ["70", "Sunny", "Yes"],
//!     ["75", "Sunny", "Yes"],
//!     ["85", "Rain", "No"],
//! ].iter().enumerate() {
//!     let example = Example::parse(row, &schema, "inline", line + 1).unwrap();
//!     train.push(example).unwrap();
//! }
//!
//! let tree = DTreeBuilder::new(&train)
//!     .classifier("Play")
//!     .build()
//!     .unwrap();
//! assert_eq!(tree.test(tree.classifier(), &train), 3);
//! ```

pub mod error;
pub mod schema;
pub mod sample;
pub mod split;
pub mod tree;
pub mod report;


pub use error::{Id3Error, Result};

pub use schema::{
    AttrId,
    Attribute,
    Domain,
    Schema,
    ValueId,
};

pub use sample::{
    Dataset,
    DatasetReader,
    Example,
    SchemaReader,
    Value,
};

pub use sample::reader::{parse_examples, parse_schema};

pub use split::{
    entropy_by_attribute,
    find_split_attribute,
    information_gain,
    Split,
};

pub use tree::{
    Branch,
    DNode,
    DTree,
    DTreeBuilder,
    NodeId,
    NodeKind,
};

pub use report::Accuracy;
