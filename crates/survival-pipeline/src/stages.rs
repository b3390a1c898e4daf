//! Individual pipeline stages. Each takes a table and returns a new one.

use crate::config::EncodingConfig;
use crate::error::{PipelineError, PipelineResult};
use std::path::Path;
use survival_core::{DataFrame, Matrix};
use survival_io::{read_frame, Schema};
use survival_preprocessing::{BinaryEncoder, Cleaner, CleaningPlan, CleaningReport, OneHotEncoder};
use tracing::info;

pub const ID_COLUMN: &str = "PassengerId";
pub const LABEL_COLUMN: &str = "Survived";

/// Numeric features taken as-is, ahead of the one-hot indicators.
pub const BASE_FEATURES: [&str; 6] = ["Pclass", "Sex", "Age", "SibSp", "Parch", "Fare"];

/// Passenger columns every input table must carry.
pub fn passenger_schema() -> Schema {
    Schema::new()
        .numeric(ID_COLUMN)
        .numeric("Pclass")
        .text("Sex")
        .numeric("Age")
        .numeric("SibSp")
        .numeric("Parch")
        .numeric("Fare")
        .text("Embarked")
}

/// Training tables also carry the label.
pub fn train_schema() -> Schema {
    passenger_schema().numeric(LABEL_COLUMN)
}

/// A table's shape and column list, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<String>,
}

impl TableSummary {
    pub fn of(df: &DataFrame) -> Self {
        TableSummary {
            rows: df.n_rows(),
            columns: df.column_names().to_vec(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }
}

pub fn load_table(path: &Path, schema: &Schema) -> PipelineResult<DataFrame> {
    let df = read_frame(path, schema)?;
    info!(path = %path.display(), rows = df.n_rows(), cols = df.n_cols(), "loaded table");
    Ok(df)
}

pub fn clean_table(
    df: &DataFrame,
    plan: &CleaningPlan,
) -> PipelineResult<(DataFrame, CleaningReport)> {
    Ok(Cleaner::new(plan.clone()).clean(df)?)
}

/// The categorical encoders used on every table of a run.
#[derive(Debug, Clone)]
pub struct Encoders {
    pub sex: BinaryEncoder,
    pub embarked: OneHotEncoder,
}

impl Encoders {
    pub fn from_config(config: &EncodingConfig) -> PipelineResult<Self> {
        Ok(Encoders {
            sex: config.sex_encoder()?,
            embarked: config.embarked_encoder()?,
        })
    }

    /// Full ordered feature list: base features, then indicator columns.
    pub fn feature_names(&self) -> Vec<String> {
        BASE_FEATURES
            .iter()
            .map(|f| f.to_string())
            .chain(self.embarked.output_columns())
            .collect()
    }

    pub fn encode(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        let df = self.sex.transform(df)?;
        Ok(self.embarked.transform(&df)?)
    }
}

/// Gather the feature columns, in order, into a matrix.
pub fn feature_matrix(df: &DataFrame, features: &[String]) -> PipelineResult<Matrix> {
    let names: Vec<&str> = features.iter().map(String::as_str).collect();
    Ok(df.select_matrix(&names)?)
}

/// The label column as 0/1 values.
pub fn labels(df: &DataFrame) -> PipelineResult<Vec<u8>> {
    df.dense_numeric(LABEL_COLUMN)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            if v == 0.0 {
                Ok(0)
            } else if v == 1.0 {
                Ok(1)
            } else {
                Err(PipelineError::InvalidValue {
                    column: LABEL_COLUMN.to_string(),
                    row,
                    value: v,
                    expected: "0 or 1",
                })
            }
        })
        .collect()
}

/// Passenger identifiers as integers.
pub fn passenger_ids(df: &DataFrame) -> PipelineResult<Vec<i64>> {
    df.dense_numeric(ID_COLUMN)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            if v.fract() == 0.0 && v.is_finite() {
                Ok(v as i64)
            } else {
                Err(PipelineError::InvalidValue {
                    column: ID_COLUMN.to_string(),
                    row,
                    value: v,
                    expected: "an integer",
                })
            }
        })
        .collect()
}
