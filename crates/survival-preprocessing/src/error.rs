use survival_core::FrameError;
use thiserror::Error;

/// A categorical cell outside the encoder's known categories.
#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "Cannot encode column '{column}' at row {row}: {} is not one of {expected:?}",
    describe_cell(.value)
)]
pub struct EncodingError {
    pub column: String,
    pub row: usize,
    pub value: Option<String>,
    pub expected: Vec<String>,
}

fn describe_cell(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => "missing value".to_string(),
    }
}

/// A feature with zero variance cannot be standardized.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Feature '{feature}' (index {index}) has zero variance (constant value {value})")]
pub struct DegenerateFeatureError {
    pub feature: String,
    pub index: usize,
    pub value: f64,
}

/// A statistic could not be computed to fill a column.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Cannot impute column '{column}': {reason}")]
pub struct ImputationError {
    pub column: String,
    pub reason: String,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreprocessError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    DegenerateFeature(#[from] DegenerateFeatureError),

    #[error(transparent)]
    Imputation(#[from] ImputationError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Invalid category vocabulary for '{column}': {reason}")]
    InvalidVocabulary { column: String, reason: String },

    #[error("Dimension mismatch: fitted on {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot fit {0} on an empty matrix")]
    EmptyInput(&'static str),

    #[error("{0} used before fit()")]
    NotFitted(&'static str),
}

pub type PreprocessResult<T> = Result<T, PreprocessError>;
