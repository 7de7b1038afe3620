//! Readers for the attribute-definition format and the example format.
//!
//! Attribute definitions, one per line:
//! ```txt
//! # comment
//! Temp: continuous
//! Outlook: Sunny, Overcast, Rain
//! Play: Yes, No
//! ```
//!
//! Examples, one comma separated record per line, positional against
//! the schema. Anything up to the last `:` of a record is treated as a
//! label and dropped:
//! ```txt
//! d1: 85, Sunny, No
//! 80, Sunny, No
//! ```
use std::path::Path;
use std::fs::File;
use std::sync::Arc;
use std::io::{BufRead, BufReader};

use log::debug;

use crate::error::{Id3Error, Result};
use crate::schema::{Attribute, Schema};
use super::{Dataset, Example};

const CONTINUOUS: &str = "continuous";


/// Parse attribute definitions from `reader`.
/// `source_name` identifies the input in error messages.
pub fn parse_schema<R>(reader: R, source_name: &str) -> Result<Schema>
    where R: BufRead
{
    let mut attributes = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') { continue; }

        let malformed = || Id3Error::MalformedAttribute {
            source_name: source_name.to_string(),
            line: i + 1,
            text: text.to_string(),
        };

        let (name, values) = text.split_once(':')
            .ok_or_else(malformed)?;
        let name = name.trim();
        let values = values.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>();

        if name.is_empty() || values.is_empty() {
            return Err(malformed());
        }

        let attr = if values == [CONTINUOUS] {
            Attribute::continuous(name)
        } else {
            Attribute::discrete(name, values)
        };
        attributes.push(attr);
    }

    debug!("{source_name}: read {} attributes", attributes.len());
    Schema::new(attributes)
}


/// Parse example records from `reader` against `schema`.
///
/// Blank lines are skipped; line numbers in errors are the 1-based
/// physical line numbers of `reader`.
/// The first invalid record aborts the whole read.
pub fn parse_examples<R>(
    reader:       R,
    schema:       Arc<Schema>,
    source_name:  &str,
    strip_prefix: bool,
) -> Result<Dataset>
    where R: BufRead
{
    let mut dataset = Dataset::new(Arc::clone(&schema));
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mut record = line.trim_end();
        if record.trim().is_empty() { continue; }

        if strip_prefix {
            if let Some((_, rest)) = record.rsplit_once(':') {
                record = rest;
            }
        }

        let fields = record.split(',').collect::<Vec<_>>();
        let example = Example::parse(&fields, &schema, source_name, i + 1)?;
        dataset.push(example)?;
    }

    debug!("{source_name}: read {} examples", dataset.len());
    Ok(dataset)
}


/// A struct that reads a [`Schema`] from an attribute-definition file.
/// # Example
/// ```no_run
/// use id3tree::SchemaReader;
/// let schema = SchemaReader::default()
///     .file("/path/to/weather.attr")
///     .read()
///     .unwrap();
/// ```
pub struct SchemaReader<P> {
    file: Option<P>,
}

impl<P> Default for SchemaReader<P> {
    fn default() -> Self {
        Self { file: None, }
    }
}

impl<P> SchemaReader<P>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }

    /// Reads the file and returns the schema.
    /// This method consumes `self`.
    pub fn read(self) -> Result<Schema> {
        let file = self.file
            .unwrap_or_else(|| panic!("The attribute file is not set"));
        let file = file.as_ref();
        let reader = BufReader::new(File::open(file)?);
        parse_schema(reader, &file.display().to_string())
    }
}


/// A struct that reads a [`Dataset`] from an example file.
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use id3tree::{SchemaReader, DatasetReader};
/// let schema = SchemaReader::default()
///     .file("/path/to/weather.attr")
///     .read()
///     .unwrap();
/// let train = DatasetReader::default()
///     .file("/path/to/weather.train")
///     .schema(Arc::new(schema))
///     .read()
///     .unwrap();
/// ```
pub struct DatasetReader<P> {
    file: Option<P>,
    schema: Option<Arc<Schema>>,
    strip_prefix: bool,
}

impl<P> Default for DatasetReader<P> {
    fn default() -> Self {
        Self { file: None, schema: None, strip_prefix: true, }
    }
}

impl<P> DatasetReader<P> {
    /// Set the schema the records are read against.
    pub fn schema(mut self, schema: Arc<Schema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set whether a leading `label:` of each record is dropped.
    /// Default is `true`.
    pub fn strip_prefix(mut self, flag: bool) -> Self {
        self.strip_prefix = flag;
        self
    }
}

impl<P> DatasetReader<P>
    where P: AsRef<Path>
{
    /// Set the file name.
    pub fn file(mut self, file: P) -> Self {
        self.file = Some(file);
        self
    }

    /// Reads the file based on the arguments.
    /// This method consumes `self`.
    pub fn read(self) -> Result<Dataset> {
        let file = self.file
            .unwrap_or_else(|| panic!("The example file is not set"));
        let schema = self.schema.unwrap_or_else(|| {
            panic!(
                "The schema is not set. \
                Use `DatasetReader::schema`."
            )
        });
        let file = file.as_ref();
        let reader = BufReader::new(File::open(file)?);
        parse_examples(
            reader, schema, &file.display().to_string(), self.strip_prefix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttrId, Domain};

    const ATTRS: &str = "\
        # weather\n\
        Temp: continuous\n\
        \n\
        Outlook: Sunny, Rain\n\
        Play: Yes, No\n";

    fn schema() -> Arc<Schema> {
        Arc::new(parse_schema(ATTRS.as_bytes(), "weather.attr").unwrap())
    }

    #[test]
    fn reads_attribute_definitions() {
        let schema = schema();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema[AttrId(0)].domain(), &Domain::Continuous);
        assert_eq!(schema[AttrId(1)].values(), ["Sunny", "Rain"]);
        assert_eq!(schema[AttrId(2)].name(), "Play");
    }

    #[test]
    fn rejects_malformed_definition() {
        let err = parse_schema("Temp continuous\n".as_bytes(), "bad.attr")
            .unwrap_err();
        assert!(matches!(
            err,
            Id3Error::MalformedAttribute { line: 1, .. }
        ));

        let err = parse_schema("a: x\nb:\n".as_bytes(), "bad.attr")
            .unwrap_err();
        assert!(matches!(
            err,
            Id3Error::MalformedAttribute { line: 2, .. }
        ));
    }

    #[test]
    fn reads_examples_and_strips_labels() {
        let data = "d1: 85, Sunny, No\n\n70,Rain,Yes\n";
        let dataset = parse_examples(data.as_bytes(), schema(), "w", true)
            .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset[0].number(AttrId(0)), 85f64);
        assert_eq!(dataset[1].number(AttrId(0)), 70f64);
    }

    #[test]
    fn reports_physical_line_numbers() {
        let data = "70,Rain,Yes\n\n71,Snow,No\n";
        let err = parse_examples(data.as_bytes(), schema(), "w.data", true)
            .unwrap_err();
        match err {
            Id3Error::UnknownValue { source_name, line, value, .. } => {
                assert_eq!(source_name, "w.data");
                assert_eq!(line, 3);
                assert_eq!(value, "Snow");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn keeps_prefix_when_asked() {
        let data = "d1: 85, Sunny, No\n";
        let err = parse_examples(data.as_bytes(), schema(), "w", false)
            .unwrap_err();
        assert!(matches!(err, Id3Error::NotANumber { line: 1, .. }));
    }
}
