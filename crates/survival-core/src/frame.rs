use crate::error::{FrameError, FrameResult};
use crate::matrix::Matrix;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn name(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single column of nullable cells. `None` is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Text(_) => ColumnKind::Text,
        }
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Dense numeric column with no missing cells.
    pub fn dense(values: &[f64]) -> Self {
        Column::Numeric(values.iter().copied().map(Some).collect())
    }
}

/// Column-oriented table with named, ordered columns of equal length.
///
/// Every transformation returns a new frame; a frame is never modified
/// after construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from `(name, column)` pairs. A repeated name replaces
    /// the earlier column in place.
    pub fn from_columns<I, S>(columns: I) -> FrameResult<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(DataFrame::new(), |df, (name, col)| df.with_column(name, col))
    }

    /// Return a copy with `column` set under `name`. An existing column of
    /// the same name keeps its position; a new one is appended.
    pub fn with_column(&self, name: impl Into<String>, column: Column) -> FrameResult<Self> {
        let name = name.into();
        if !self.names.is_empty() && column.len() != self.n_rows {
            return Err(FrameError::LengthMismatch {
                column: name,
                expected: self.n_rows,
                got: column.len(),
            });
        }
        let mut out = self.clone();
        out.n_rows = column.len();
        match out.position(&name) {
            Some(idx) => out.columns[idx] = column,
            None => {
                out.names.push(name);
                out.columns.push(column);
            }
        }
        Ok(out)
    }

    /// Return a copy without `name`. Absent columns are ignored.
    pub fn without_column(&self, name: &str) -> Self {
        let mut out = self.clone();
        if let Some(idx) = out.position(name) {
            out.names.remove(idx);
            out.columns.remove(idx);
            if out.names.is_empty() {
                out.n_rows = 0;
            }
        }
        out
    }
}

// ─── Access ─────────────────────────────────────────────────────────────────

impl DataFrame {
    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.names.len())
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> FrameResult<&Column> {
        self.position(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> FrameResult<&[Option<f64>]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            other => Err(FrameError::WrongKind {
                column: name.to_string(),
                expected: ColumnKind::Numeric.name(),
                actual: other.kind().name(),
            }),
        }
    }

    pub fn text(&self, name: &str) -> FrameResult<&[Option<String>]> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            other => Err(FrameError::WrongKind {
                column: name.to_string(),
                expected: ColumnKind::Text.name(),
                actual: other.kind().name(),
            }),
        }
    }

    /// Numeric column with every cell present.
    pub fn dense_numeric(&self, name: &str) -> FrameResult<Vec<f64>> {
        self.numeric(name)?
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.ok_or_else(|| FrameError::MissingValue {
                    column: name.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Missing-value count per column, in column order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.clone(), c.null_count()))
            .collect()
    }

    /// Gather the named numeric columns, in the given order, into a matrix.
    pub fn select_matrix(&self, names: &[&str]) -> FrameResult<Matrix> {
        let columns = names
            .iter()
            .map(|n| self.dense_numeric(n))
            .collect::<FrameResult<Vec<_>>>()?;
        if columns.is_empty() {
            return Ok(Matrix::zeros(self.n_rows, 0));
        }
        Matrix::from_columns(&columns)
    }
}
