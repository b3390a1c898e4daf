use crate::csv_io::{LoadError, LoadResult};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One row of the reference answer file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReferenceLabel {
    #[serde(rename = "PassengerId")]
    pub passenger_id: i64,
    #[serde(rename = "Survived")]
    pub survived: u8,
}

const REFERENCE_COLUMNS: [&str; 2] = ["PassengerId", "Survived"];

/// Read `PassengerId,Survived` pairs. Other columns are ignored.
pub fn read_reference_labels(path: impl AsRef<Path>) -> LoadResult<Vec<ReferenceLabel>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let labels = read_reference_labels_from(file, &path.display().to_string())?;
    debug!(path = %path.display(), rows = labels.len(), "loaded reference labels");
    Ok(labels)
}

pub fn read_reference_labels_from<R: Read>(
    reader: R,
    source_name: &str,
) -> LoadResult<Vec<ReferenceLabel>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    for column in REFERENCE_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                source_name: source_name.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut labels = Vec::new();
    for (row, result) in rdr.deserialize::<ReferenceLabel>().enumerate() {
        let label = result?;
        if label.survived > 1 {
            return Err(LoadError::Parse {
                column: "Survived".to_string(),
                row,
                value: label.survived.to_string(),
                expected: "0 or 1",
            });
        }
        labels.push(label);
    }
    Ok(labels)
}
