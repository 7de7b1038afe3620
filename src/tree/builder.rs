use crate::error::Result;
use crate::sample::Dataset;
use crate::DTree;


/// A struct that builds [`DTree`].
/// `DTreeBuilder` keeps the classifier and the candidate attributes,
/// named as in the schema.
///
/// By default the classifier is the last attribute of the schema and
/// every other attribute is a candidate.
///
/// # Example
///
/// ```no_run
/// use id3tree::{DTreeBuilder, DatasetReader, SchemaReader};
/// use std::sync::Arc;
///
/// let schema = SchemaReader::default()
///     .file("/path/to/weather.attr")
///     .read()
///     .unwrap();
/// let train = DatasetReader::default()
///     .file("/path/to/weather.train")
///     .schema(Arc::new(schema))
///     .read()
///     .unwrap();
/// let tree = DTreeBuilder::new(&train)
///     .classifier("Play")
///     .exclude("Day")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct DTreeBuilder<'a> {
    training:   &'a Dataset,
    classifier: Option<String>,
    attributes: Option<Vec<String>>,
    excluded:   Vec<String>,
}

impl<'a> DTreeBuilder<'a> {
    /// Construct a new instance of [`DTreeBuilder`].
    pub fn new(training: &'a Dataset) -> Self {
        Self {
            training,
            classifier: None,
            attributes: None,
            excluded:   Vec::new(),
        }
    }

    /// Set the attribute to predict.
    /// Default is the last attribute of the schema.
    pub fn classifier<S: ToString>(mut self, name: S) -> Self {
        self.classifier = Some(name.to_string());
        self
    }

    /// Set the candidate attributes.
    /// Default is every attribute except the classifier.
    pub fn attributes<I, S>(mut self, names: I) -> Self
        where I: IntoIterator<Item = S>,
              S: ToString,
    {
        let names = names.into_iter()
            .map(|name| name.to_string())
            .collect();
        self.attributes = Some(names);
        self
    }

    /// Remove an attribute from the candidates.
    pub fn exclude<S: ToString>(mut self, name: S) -> Self {
        self.excluded.push(name.to_string());
        self
    }

    /// Resolve the names and build a [`DTree`].
    /// This method consumes `self`.
    pub fn build(self) -> Result<DTree> {
        let schema = self.training.schema();

        let classifier = match &self.classifier {
            Some(name) => schema.id_of(name)?,
            None => {
                let (last, _) = schema.iter()
                    .last()
                    .unwrap_or_else(|| panic!("The schema has no attribute"));
                last
            },
        };

        let mut attributes = match &self.attributes {
            Some(names) => names.iter()
                .map(|name| schema.id_of(name))
                .collect::<Result<Vec<_>>>()?,
            None => schema.iter()
                .map(|(id, _)| id)
                .filter(|&id| id != classifier)
                .collect(),
        };

        for name in self.excluded.iter() {
            let id = schema.id_of(name)?;
            attributes.retain(|&a| a != id);
        }

        DTree::build(classifier, self.training.clone(), &attributes)
    }
}
