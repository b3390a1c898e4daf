use crate::error::{PipelineError, PipelineResult};
use survival_core::Matrix;
use survival_linear::LogisticRegression;
use survival_preprocessing::StandardScaler;

/// Trait for unsupervised transformers (scalers, etc.).
pub trait Transformer {
    fn fit(&mut self, x: &Matrix) -> PipelineResult<()>;
    fn transform(&self, x: &Matrix) -> PipelineResult<Matrix>;
    fn fit_transform(&mut self, x: &Matrix) -> PipelineResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }
}

/// Trait for supervised binary estimators.
pub trait Estimator {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> PipelineResult<()>;
    fn predict(&self, x: &Matrix) -> PipelineResult<Vec<u8>>;
    /// Iterations the last fit took, for estimators that iterate.
    fn n_iter(&self) -> Option<usize> {
        None
    }
}

impl Transformer for StandardScaler {
    fn fit(&mut self, x: &Matrix) -> PipelineResult<()> {
        Ok(StandardScaler::fit(self, x)?)
    }

    fn transform(&self, x: &Matrix) -> PipelineResult<Matrix> {
        Ok(StandardScaler::transform(self, x)?)
    }
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Matrix, y: &[f64]) -> PipelineResult<()> {
        Ok(LogisticRegression::fit(self, x, y)?)
    }

    fn predict(&self, x: &Matrix) -> PipelineResult<Vec<u8>> {
        Ok(LogisticRegression::predict(self, x)?)
    }

    fn n_iter(&self) -> Option<usize> {
        Some(LogisticRegression::n_iter(self))
    }
}

/// A chain of transformers followed by a final estimator.
///
/// `fit` is the only method that changes fitted state; `transform` and
/// `predict` reuse it as-is, so held-out data never influences it.
pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
    estimator: Option<Box<dyn Estimator>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            transformers: Vec::new(),
            estimator: None,
        }
    }

    /// Add a transformer step.
    pub fn add_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Set the final estimator.
    pub fn set_estimator(mut self, estimator: Box<dyn Estimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Fit all transformers and the estimator.
    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> PipelineResult<()> {
        let mut current_x = x.clone();

        for t in &mut self.transformers {
            current_x = t.fit_transform(&current_x)?;
        }

        match &mut self.estimator {
            Some(est) => est.fit(&current_x, y),
            None => Err(PipelineError::NoEstimator),
        }
    }

    /// Run `x` through the fitted transformers only.
    pub fn transform(&self, x: &Matrix) -> PipelineResult<Matrix> {
        let mut current_x = x.clone();
        for t in &self.transformers {
            current_x = t.transform(&current_x)?;
        }
        Ok(current_x)
    }

    /// Transform through all transformers and predict with the estimator.
    pub fn predict(&self, x: &Matrix) -> PipelineResult<Vec<u8>> {
        let current_x = self.transform(x)?;
        match &self.estimator {
            Some(est) => est.predict(&current_x),
            None => Err(PipelineError::NoEstimator),
        }
    }

    pub fn n_iter(&self) -> Option<usize> {
        self.estimator.as_ref().and_then(|e| e.n_iter())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
