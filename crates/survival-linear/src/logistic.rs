use crate::error::{ModelError, ModelResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use survival_core::Matrix;
use tracing::{debug, warn};

/// Logistic regression: binary classification via gradient descent.
///
/// Minimises the mean binary cross-entropy plus an L2 penalty
/// `||w||² / (2·C·n)`, so `c` plays the usual inverse-regularisation role.
/// The bias is not penalised.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub weights: Option<Vec<f64>>,
    pub bias: Option<f64>,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub c: f64,
    pub seed: Option<u64>,
    n_iter: usize,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize) -> Self {
        LogisticRegression {
            weights: None,
            bias: None,
            learning_rate,
            max_iter,
            tol: 1e-4,
            c: 1.0,
            seed: None,
            n_iter: 0,
        }
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Iterations run by the last `fit`.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    fn sigmoid_val(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    fn decision(w: &[f64], b: f64, row: &[f64]) -> f64 {
        w.iter().zip(row).fold(b, |z, (wj, xj)| z + wj * xj)
    }

    pub fn fit(&mut self, x: &Matrix, y: &[f64]) -> ModelResult<()> {
        let (n, p) = x.shape();
        if n == 0 {
            return Err(ModelError::EmptyInput);
        }
        if y.len() != n {
            return Err(ModelError::LabelCountMismatch {
                rows: n,
                labels: y.len(),
            });
        }
        if let Some((row, &value)) = y
            .iter()
            .enumerate()
            .find(|(_, &v)| v != 0.0 && v != 1.0)
        {
            return Err(ModelError::InvalidLabel { row, value });
        }

        let n_f = n as f64;
        let penalty = 1.0 / (self.c * n_f);

        // Small seeded start so repeated fits on the same data agree exactly.
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut w: Vec<f64> = (0..p).map(|_| rng.gen_range(-0.01..0.01)).collect();
        let mut b = 0.0;

        let mut converged = false;
        let mut iterations = 0;
        for _iter in 0..self.max_iter {
            iterations += 1;
            let mut dw = vec![0.0; p];
            let mut db = 0.0;

            for (row, &yi) in x.rows().zip(y) {
                let a = Self::sigmoid_val(Self::decision(&w, b, row));
                let error = a - yi;
                for (g, xj) in dw.iter_mut().zip(row) {
                    *g += error * xj;
                }
                db += error;
            }

            let mut max_grad = 0.0f64;
            for (wj, g) in w.iter_mut().zip(&dw) {
                let grad = g / n_f + penalty * *wj;
                *wj -= self.learning_rate * grad;
                max_grad = max_grad.max(grad.abs());
            }
            let grad_b = db / n_f;
            b -= self.learning_rate * grad_b;
            max_grad = max_grad.max(grad_b.abs());

            if max_grad < self.tol {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(iterations, "logistic regression converged");
        } else {
            warn!(
                max_iter = self.max_iter,
                "logistic regression stopped before reaching tolerance"
            );
        }

        self.n_iter = iterations;
        self.weights = Some(w);
        self.bias = Some(b);
        Ok(())
    }

    /// Predict P(y = 1) per row.
    pub fn predict_proba(&self, x: &Matrix) -> ModelResult<Vec<f64>> {
        let w = self.weights.as_ref().ok_or(ModelError::NotFitted)?;
        if x.n_cols() != w.len() {
            return Err(ModelError::DimensionMismatch {
                expected: w.len(),
                got: x.n_cols(),
            });
        }
        let b = self.bias.unwrap_or(0.0);
        Ok(x
            .rows()
            .map(|row| Self::sigmoid_val(Self::decision(w, b, row)))
            .collect())
    }

    /// Predict class labels (threshold = 0.5).
    pub fn predict(&self, x: &Matrix) -> ModelResult<Vec<u8>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| u8::from(p >= 0.5))
            .collect())
    }
}
