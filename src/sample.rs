//! Struct `Dataset` represents an ordered collection of examples.

// Provides the example struct.
pub(crate) mod example;
// Provides the dataset struct and its aggregate queries.
pub(crate) mod dataset;

// Provides readers for the attribute and example formats.
pub(crate) mod reader;
// Converts `polars::DataFrame` into `Dataset`.
pub(crate) mod dataframe;


pub use example::{Example, Value};
pub use dataset::Dataset;
pub use reader::{SchemaReader, DatasetReader};
