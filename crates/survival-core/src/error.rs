use thiserror::Error;

/// Core error type for table and matrix operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Column '{column}' has {got} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Column '{column}' is {actual}, expected {expected}")]
    WrongKind {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Index out of bounds: ({row}, {col}) for shape {shape:?}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },
}

pub type FrameResult<T> = Result<T, FrameError>;
