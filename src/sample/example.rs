use serde::{Serialize, Deserialize};

use std::ops::Index;
use std::sync::Arc;

use crate::error::{Id3Error, Result};
use crate::schema::{AttrId, Domain, Schema, ValueId};

/// A typed attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Discrete(ValueId),
    Continuous(f64),
}

impl Value {
    pub fn as_discrete(&self) -> Option<ValueId> {
        match self {
            Self::Discrete(v) => Some(*v),
            Self::Continuous(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Discrete(_) => None,
            Self::Continuous(x) => Some(*x),
        }
    }
}

/// An immutable example, holding one value per schema attribute.
///
/// An example remembers the schema it was read against;
/// discrete values are positions in that schema's label lists.
#[derive(Clone, Debug)]
pub struct Example {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl Example {
    /// Parse a record of raw fields against `schema`.
    ///
    /// `source_name` and `line` (1-based) are only used for
    /// error messages.
    /// Discrete fields must be one of the attribute's legal labels,
    /// continuous fields must parse as a finite float.
    /// Nothing is coerced.
    pub fn parse<S>(
        fields:      &[S],
        schema:      &Arc<Schema>,
        source_name: &str,
        line:        usize,
    ) -> Result<Self>
        where S: AsRef<str>
    {
        if fields.len() != schema.len() {
            return Err(Id3Error::Arity {
                source_name: source_name.to_string(),
                line,
                found: fields.len(),
                expected: schema.len(),
            });
        }

        let values = schema.attributes()
            .iter()
            .zip(fields)
            .map(|(attr, field)| {
                let field = field.as_ref().trim();
                match attr.domain() {
                    Domain::Discrete(legal) => {
                        attr.value_id(field)
                            .map(Value::Discrete)
                            .ok_or_else(|| Id3Error::UnknownValue {
                                source_name: source_name.to_string(),
                                line,
                                value: field.to_string(),
                                attribute: attr.name().to_string(),
                                legal: legal.clone(),
                            })
                    },
                    Domain::Continuous => {
                        field.parse::<f64>()
                            .ok()
                            .filter(|x| x.is_finite())
                            .map(Value::Continuous)
                            .ok_or_else(|| Id3Error::NotANumber {
                                source_name: source_name.to_string(),
                                line,
                                value: field.to_string(),
                                attribute: attr.name().to_string(),
                            })
                    },
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { schema: Arc::clone(schema), values, })
    }

    /// Construct an example from values already validated
    /// against `schema`.
    pub(crate) fn from_values(schema: Arc<Schema>, values: Vec<Value>)
        -> Self
    {
        Self { schema, values, }
    }

    /// The schema this example was read against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, attr: AttrId) -> Value {
        self.values[attr.0]
    }

    /// The discrete value of `attr`.
    ///
    /// # Panics
    /// Panics if `attr` is continuous.
    pub fn label(&self, attr: AttrId) -> ValueId {
        self.values[attr.0].as_discrete()
            .unwrap_or_else(|| {
                panic!("Attribute {} is not discrete", attr.0)
            })
    }

    /// The continuous value of `attr`.
    ///
    /// # Panics
    /// Panics if `attr` is discrete.
    pub fn number(&self, attr: AttrId) -> f64 {
        self.values[attr.0].as_f64()
            .unwrap_or_else(|| {
                panic!("Attribute {} is not continuous", attr.0)
            })
    }
}

impl Index<AttrId> for Example {
    type Output = Value;
    fn index(&self, attr: AttrId) -> &Self::Output {
        &self.values[attr.0]
    }
}
