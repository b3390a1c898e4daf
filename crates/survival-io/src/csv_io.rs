use survival_core::{Column, ColumnKind, DataFrame, FrameError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' missing from {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Column '{column}' row {row}: cannot parse {value:?} as {expected}")]
    Parse {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Columns a file must provide, with the kind each is read as.
///
/// Columns not named here are still loaded; their kind is inferred
/// (numeric when every present cell parses as a number).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    required: Vec<(String, ColumnKind)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numeric(mut self, name: &str) -> Self {
        self.required.push((name.to_string(), ColumnKind::Numeric));
        self
    }

    pub fn text(mut self, name: &str) -> Self {
        self.required.push((name.to_string(), ColumnKind::Text));
        self
    }

    pub fn required(&self) -> &[(String, ColumnKind)] {
        &self.required
    }

    fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.required
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, k)| *k)
    }
}

/// Read a CSV file with a header row into a `DataFrame`.
pub fn read_frame(path: impl AsRef<Path>, schema: &Schema) -> LoadResult<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let df = read_frame_from(file, schema, &path.display().to_string())?;
    debug!(path = %path.display(), rows = df.n_rows(), cols = df.n_cols(), "loaded frame");
    Ok(df)
}

/// Read CSV text from any reader. `source_name` labels errors.
pub fn read_frame_from<R: Read>(
    reader: R,
    schema: &Schema,
    source_name: &str,
) -> LoadResult<DataFrame> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    for (name, _) in schema.required() {
        if !headers.iter().any(|h| h == name) {
            return Err(LoadError::MissingColumn {
                source_name: source_name.to_string(),
                column: name.clone(),
            });
        }
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in rdr.records() {
        let record = result?;
        for (cells, field) in raw.iter_mut().zip(record.iter()) {
            cells.push(field.to_string());
        }
    }

    let mut df = DataFrame::new();
    for (name, cells) in headers.iter().zip(raw) {
        let column = match schema.kind_of(name) {
            Some(ColumnKind::Numeric) => parse_numeric(name, &cells)?,
            Some(ColumnKind::Text) => text_column(cells),
            None => infer_column(cells),
        };
        df = df.with_column(name.as_str(), column)?;
    }
    Ok(df)
}

fn parse_numeric(name: &str, cells: &[String]) -> LoadResult<Column> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            if cell.is_empty() {
                return Ok(None);
            }
            cell.parse::<f64>().map(Some).map_err(|_| LoadError::Parse {
                column: name.to_string(),
                row,
                value: cell.clone(),
                expected: "number",
            })
        })
        .collect::<LoadResult<Vec<_>>>()
        .map(Column::Numeric)
}

fn text_column(cells: Vec<String>) -> Column {
    Column::Text(
        cells
            .into_iter()
            .map(|c| if c.is_empty() { None } else { Some(c) })
            .collect(),
    )
}

fn infer_column(cells: Vec<String>) -> Column {
    let all_numeric = cells
        .iter()
        .filter(|c| !c.is_empty())
        .all(|c| c.parse::<f64>().is_ok());
    if all_numeric {
        Column::Numeric(cells.iter().map(|c| c.parse::<f64>().ok()).collect())
    } else {
        text_column(cells)
    }
}
