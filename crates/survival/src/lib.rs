//! # survival
//!
//! Predicts passenger survival from a labeled manifest with a standardized
//! logistic regression, then scores the predictions against a reference
//! answer file.
//!
//! ## Modules
//!
//! - **core** — `DataFrame` of nullable numeric/text columns, dense `Matrix`
//! - **io** — CSV loading with required-column schemas, reference labels
//! - **preprocessing** — column dropping, median/mode imputation, binary and
//!   one-hot encoding over fixed vocabularies, `StandardScaler`
//! - **linear** — seeded, L2-regularised `LogisticRegression`
//! - **metrics** — accuracy, confusion matrix, per-class scores, join agreement
//! - **pipeline** — configuration, stage functions, `Pipeline` chain, `run`

/// Tables and matrices.
pub use survival_core as core;

/// CSV input.
pub use survival_io as io;

/// Cleaning, encoding and scaling.
pub use survival_preprocessing as preprocessing;

/// Linear models.
pub use survival_linear as linear;

/// Evaluation metrics.
pub use survival_metrics as metrics;

/// Stage composition and the run driver.
pub use survival_pipeline as pipeline;
