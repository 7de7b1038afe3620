//! Errors raised while reading a schema or examples,
//! or while configuring a tree.
//!
//! Violated algorithmic preconditions (e.g., the majority of an empty
//! dataset) are not represented here; they are defects and panic.
use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while loading data or building a tree.
#[derive(Debug, Error)]
pub enum Id3Error {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record does not have one value per attribute.
    #[error(
        "{source_name}: {line}: Incorrect number of attributes \
        (saw {found}, expected {expected})"
    )]
    Arity {
        source_name: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    /// A discrete value outside the attribute's legal values.
    #[error(
        "{source_name}: {line}: Value {value} not in known values \
        {legal:?} for attribute {attribute}"
    )]
    UnknownValue {
        source_name: String,
        line: usize,
        value: String,
        attribute: String,
        legal: Vec<String>,
    },

    /// A continuous value that does not parse as a float.
    #[error(
        "{source_name}: {line}: Value {value} for continuous attribute \
        {attribute} is not a number"
    )]
    NotANumber {
        source_name: String,
        line: usize,
        value: String,
        attribute: String,
    },

    /// A missing cell (only reachable through the `DataFrame` adapter).
    #[error("{source_name}: {line}: Missing value for attribute {attribute}")]
    MissingValue {
        source_name: String,
        line: usize,
        attribute: String,
    },

    /// An attribute definition line that cannot be parsed.
    #[error("{source_name}: {line}: Malformed attribute definition `{text}`")]
    MalformedAttribute {
        source_name: String,
        line: usize,
        text: String,
    },

    /// Two attributes share a name.
    #[error("Attribute `{0}` is defined more than once")]
    DuplicateAttribute(String),

    /// A name that is not part of the schema.
    #[error("The attribute named `{0}` does not exist")]
    UnknownAttribute(String),

    /// The classifier must have a finite set of values.
    #[error("The classifier `{0}` is continuous; it must be discrete")]
    ContinuousClassifier(String),

    /// The classifier cannot be used to split on itself.
    #[error("The classifier `{0}` is also listed as a candidate attribute")]
    ClassifierAsCandidate(String),

    /// An example read against a schema other than the dataset's.
    #[error(
        "An example read against a different schema cannot join \
        a dataset over [{expected}]"
    )]
    SchemaMismatch {
        expected: String,
    },

    /// A tree needs at least one training example.
    #[error("The training set is empty")]
    EmptyTrainingSet,

    /// Failure inside `polars`.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Failure while (de)serializing a tree.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A deserialized tree whose nodes do not form a resolved tree.
    #[error("Malformed tree: {0}")]
    MalformedTree(String),
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, Id3Error>;
