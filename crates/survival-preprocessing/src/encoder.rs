use crate::error::{EncodingError, PreprocessError, PreprocessResult};
use std::collections::HashSet;
use survival_core::{Column, DataFrame, FrameError};
use tracing::debug;

/// Encode a two-valued categorical column as `0.0` / `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryEncoder {
    pub column: String,
    /// Category mapped to 0.
    pub negative: String,
    /// Category mapped to 1.
    pub positive: String,
}

impl BinaryEncoder {
    pub fn new(column: &str, negative: &str, positive: &str) -> PreprocessResult<Self> {
        if negative == positive {
            return Err(PreprocessError::InvalidVocabulary {
                column: column.to_string(),
                reason: format!("both categories are {negative:?}"),
            });
        }
        Ok(BinaryEncoder {
            column: column.to_string(),
            negative: negative.to_string(),
            positive: positive.to_string(),
        })
    }

    fn categories(&self) -> Vec<String> {
        vec![self.negative.clone(), self.positive.clone()]
    }

    /// Replace the text column with its numeric code.
    ///
    /// A column that is already numeric with every cell in {0, 1} is
    /// returned unchanged.
    pub fn transform(&self, df: &DataFrame) -> PreprocessResult<DataFrame> {
        let encoded = match df.column(&self.column)? {
            Column::Text(cells) => cells
                .iter()
                .enumerate()
                .map(|(row, cell)| match cell.as_deref() {
                    Some(v) if v == self.negative => Ok(Some(0.0)),
                    Some(v) if v == self.positive => Ok(Some(1.0)),
                    _ => Err(self.error(row, cell.clone())),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Column::Numeric(cells) => {
                for (row, cell) in cells.iter().enumerate() {
                    if !matches!(cell, Some(v) if *v == 0.0 || *v == 1.0) {
                        return Err(self.error(row, cell.map(|v| v.to_string())).into());
                    }
                }
                return Ok(df.clone());
            }
        };
        debug!(column = %self.column, "binary-encoded column");
        Ok(df.with_column(self.column.as_str(), Column::Numeric(encoded))?)
    }

    fn error(&self, row: usize, value: Option<String>) -> EncodingError {
        EncodingError {
            column: self.column.clone(),
            row,
            value,
            expected: self.categories(),
        }
    }
}

/// One-hot encode a categorical column against a fixed vocabulary,
/// dropping the reference level.
///
/// Output columns are named `{column}_{level}` and follow vocabulary order,
/// so every table encoded by the same encoder gets the same columns
/// whatever categories it happens to contain.
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotEncoder {
    pub column: String,
    pub vocabulary: Vec<String>,
    pub reference: String,
}

impl OneHotEncoder {
    pub fn new(column: &str, vocabulary: &[String], reference: &str) -> PreprocessResult<Self> {
        let invalid = |reason: String| PreprocessError::InvalidVocabulary {
            column: column.to_string(),
            reason,
        };
        if !vocabulary.iter().any(|v| v == reference) {
            return Err(invalid(format!(
                "reference level {reference:?} not in {vocabulary:?}"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = vocabulary.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(invalid(format!("duplicate level {dup:?}")));
        }
        Ok(OneHotEncoder {
            column: column.to_string(),
            vocabulary: vocabulary.to_vec(),
            reference: reference.to_string(),
        })
    }

    /// Levels that get an indicator column, in vocabulary order.
    pub fn levels(&self) -> impl Iterator<Item = &String> {
        self.vocabulary.iter().filter(move |v| **v != self.reference)
    }

    pub fn output_columns(&self) -> Vec<String> {
        self.levels()
            .map(|level| format!("{}_{}", self.column, level))
            .collect()
    }

    /// Replace the categorical column with indicator columns, appended at
    /// the end of the frame.
    ///
    /// A frame where the source column is gone and every indicator column
    /// is present is taken as already encoded and returned unchanged.
    pub fn transform(&self, df: &DataFrame) -> PreprocessResult<DataFrame> {
        let outputs = self.output_columns();
        if !df.has_column(&self.column) {
            if outputs.iter().all(|c| df.has_column(c)) {
                return Ok(df.clone());
            }
            return Err(FrameError::MissingColumn(self.column.clone()).into());
        }

        let cells = df.text(&self.column)?;
        let mut indicators: Vec<Vec<f64>> = vec![vec![0.0; cells.len()]; outputs.len()];
        for (row, cell) in cells.iter().enumerate() {
            let value = match cell.as_deref() {
                Some(v) if self.vocabulary.iter().any(|known| known == v) => v,
                _ => {
                    return Err(EncodingError {
                        column: self.column.clone(),
                        row,
                        value: cell.clone(),
                        expected: self.vocabulary.clone(),
                    }
                    .into())
                }
            };
            if let Some(k) = self.levels().position(|level| level == value) {
                indicators[k][row] = 1.0;
            }
        }

        let mut out = df.without_column(&self.column);
        for (name, values) in outputs.iter().zip(&indicators) {
            out = out.with_column(name.as_str(), Column::dense(values))?;
        }
        debug!(column = %self.column, outputs = ?outputs, "one-hot encoded column");
        Ok(out)
    }
}
