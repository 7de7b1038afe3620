use polars::prelude::*;

use std::sync::Arc;

use crate::error::{Id3Error, Result};
use crate::schema::{Domain, Schema};
use super::{Dataset, Example, Value};

const SOURCE_NAME: &str = "DataFrame";

/// Column values of one attribute, before validation.
enum Column {
    Labels(Vec<Option<String>>),
    Numbers(Vec<Option<f64>>),
}

impl Column {
    fn from_series(series: &Series, domain: &Domain) -> Result<Self> {
        let column = match domain {
            Domain::Discrete(_) => {
                let labels = series.cast(&DataType::Utf8)?
                    .utf8()?
                    .into_iter()
                    .map(|v| v.map(str::to_string))
                    .collect::<Vec<_>>();
                Self::Labels(labels)
            },
            Domain::Continuous => {
                let numbers = series.cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .collect::<Vec<_>>();
                Self::Numbers(numbers)
            },
        };
        Ok(column)
    }
}

impl Dataset {
    /// Convert `polars::DataFrame` into `Dataset`.
    ///
    /// Each attribute of `schema` is read from the column of the same
    /// name; other columns are ignored. Discrete columns are compared
    /// as strings, continuous columns are cast to `f64`.
    /// Errors report the 1-based row.
    pub fn from_dataframe(data: &DataFrame, schema: Arc<Schema>)
        -> Result<Self>
    {
        let columns = schema.attributes()
            .iter()
            .map(|attr| -> Result<Column> {
                let series = data.column(attr.name())?;
                Column::from_series(series, attr.domain())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut dataset = Dataset::new(Arc::clone(&schema));
        for row in 0..data.height() {
            let line = row + 1;
            let values = schema.attributes()
                .iter()
                .zip(&columns)
                .map(|(attr, column)| -> Result<Value> {
                    let missing = || Id3Error::MissingValue {
                        source_name: SOURCE_NAME.to_string(),
                        line,
                        attribute: attr.name().to_string(),
                    };
                    match column {
                        Column::Labels(labels) => {
                            let label = labels[row].as_deref()
                                .ok_or_else(missing)?;
                            attr.value_id(label)
                                .map(Value::Discrete)
                                .ok_or_else(|| Id3Error::UnknownValue {
                                    source_name: SOURCE_NAME.to_string(),
                                    line,
                                    value: label.to_string(),
                                    attribute: attr.name().to_string(),
                                    legal: attr.values().to_vec(),
                                })
                        },
                        Column::Numbers(numbers) => {
                            let x = numbers[row].ok_or_else(missing)?;
                            if !x.is_finite() {
                                return Err(Id3Error::NotANumber {
                                    source_name: SOURCE_NAME.to_string(),
                                    line,
                                    value: x.to_string(),
                                    attribute: attr.name().to_string(),
                                });
                            }
                            Ok(Value::Continuous(x))
                        },
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let example = Example::from_values(Arc::clone(&schema), values);
            dataset.push(example)?;
        }
        Ok(dataset)
    }
}
