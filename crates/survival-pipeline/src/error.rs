use std::path::PathBuf;
use survival_core::FrameError;
use survival_io::LoadError;
use survival_linear::ModelError;
use survival_preprocessing::{DegenerateFeatureError, EncodingError, PreprocessError};
use thiserror::Error;

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column '{column}' row {row}: {value} is not {expected}")]
    InvalidValue {
        column: String,
        row: usize,
        value: f64,
        expected: &'static str,
    },

    #[error("Pipeline has no estimator")]
    NoEstimator,
}

impl PipelineError {
    /// The encoding failure behind this error, if that is what it is.
    pub fn as_encoding(&self) -> Option<&EncodingError> {
        match self {
            PipelineError::Preprocess(PreprocessError::Encoding(e)) => Some(e),
            _ => None,
        }
    }

    /// The zero-variance failure behind this error, if that is what it is.
    pub fn as_degenerate_feature(&self) -> Option<&DegenerateFeatureError> {
        match self {
            PipelineError::Preprocess(PreprocessError::DegenerateFeature(e)) => Some(e),
            _ => None,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
