//! Attribute definitions.
//!
//! Names are resolved to [`AttrId`] / [`ValueId`] handles once,
//! when the [`Schema`] is built and examples are read against it.
//! The induction code never looks anything up by name.
use serde::{Serialize, Deserialize};

use std::fmt;
use std::ops::Index;
use std::collections::HashMap;

use crate::error::{Id3Error, Result};

/// Position of an attribute in its [`Schema`].
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
pub struct AttrId(pub usize);

/// Position of a discrete label in its attribute's value list.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize,
)]
pub struct ValueId(pub usize);

/// The range of an attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Numeric values, split by a threshold.
    Continuous,
    /// A finite, ordered set of legal labels.
    Discrete(Vec<String>),
}

/// A named attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    domain: Domain,
}

impl Attribute {
    /// Construct a continuous attribute.
    pub fn continuous<T: ToString>(name: T) -> Self {
        Self { name: name.to_string(), domain: Domain::Continuous, }
    }

    /// Construct a discrete attribute with the given legal labels.
    pub fn discrete<T, I, S>(name: T, values: I) -> Self
        where T: ToString,
              I: IntoIterator<Item = S>,
              S: ToString,
    {
        let values = values.into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>();
        Self { name: name.to_string(), domain: Domain::Discrete(values), }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self.domain, Domain::Continuous)
    }

    /// Legal labels in declaration order.
    /// A continuous attribute has none.
    pub fn values(&self) -> &[String] {
        match &self.domain {
            Domain::Continuous => &[],
            Domain::Discrete(values) => &values[..],
        }
    }

    /// Label of a value handle.
    ///
    /// # Panics
    /// Panics if `value` is out of range for this attribute.
    pub fn label(&self, value: ValueId) -> &str {
        &self.values()[value.0]
    }

    /// Resolve a label to its handle.
    pub fn value_id(&self, label: &str) -> Option<ValueId> {
        self.values()
            .iter()
            .position(|v| v == label)
            .map(ValueId)
    }

    /// Value handles, ordered by their labels.
    /// Tie-breaking and child ordering depend on this order.
    pub fn sorted_values(&self) -> Vec<ValueId> {
        let values = self.values();
        let mut ids = (0..values.len()).map(ValueId)
            .collect::<Vec<_>>();
        ids.sort_by(|a, b| values[a.0].cmp(&values[b.0]));
        ids
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.domain {
            Domain::Continuous => write!(f, "{}: continuous", self.name),
            Domain::Discrete(values) => {
                write!(f, "{}: {}", self.name, values.join(", "))
            },
        }
    }
}

/// An ordered collection of attributes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Attribute>", into = "Vec<Attribute>")]
pub struct Schema {
    attributes: Vec<Attribute>,
    name_to_index: HashMap<String, usize>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl TryFrom<Vec<Attribute>> for Schema {
    type Error = Id3Error;
    fn try_from(attributes: Vec<Attribute>) -> Result<Self> {
        Self::new(attributes)
    }
}

impl From<Schema> for Vec<Attribute> {
    fn from(schema: Schema) -> Self {
        schema.attributes
    }
}

impl Schema {
    /// Construct a schema, rejecting duplicated names.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        let mut name_to_index = HashMap::with_capacity(attributes.len());
        for (i, attr) in attributes.iter().enumerate() {
            let name = attr.name().to_string();
            if name_to_index.insert(name, i).is_some() {
                return Err(
                    Id3Error::DuplicateAttribute(attr.name().to_string())
                );
            }
        }
        Ok(Self { attributes, name_to_index, })
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes[..]
    }

    /// Iterate over `(handle, attribute)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (AttrId, &Attribute)> {
        self.attributes.iter()
            .enumerate()
            .map(|(i, attr)| (AttrId(i), attr))
    }

    /// Resolve a name to its handle.
    pub fn id_of(&self, name: &str) -> Result<AttrId> {
        self.name_to_index.get(name)
            .copied()
            .map(AttrId)
            .ok_or_else(|| Id3Error::UnknownAttribute(name.to_string()))
    }

    /// Sort attribute handles by attribute name.
    pub fn sorted_by_name(&self, ids: &[AttrId]) -> Vec<AttrId> {
        let mut ids = ids.to_vec();
        ids.sort_by(|a, b| self[*a].name().cmp(self[*b].name()));
        ids
    }
}

impl Index<AttrId> for Schema {
    type Output = Attribute;
    fn index(&self, id: AttrId) -> &Self::Output {
        &self.attributes[id.0]
    }
}
