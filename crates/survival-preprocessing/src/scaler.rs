use crate::error::{DegenerateFeatureError, PreprocessError, PreprocessResult};
use serde::{Deserialize, Serialize};
use survival_core::Matrix;
use tracing::debug;

/// What to do with a feature whose fitted standard deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantFeaturePolicy {
    /// Fail with `DegenerateFeatureError`.
    #[default]
    Reject,
    /// Subtract the mean and leave the scale at 1.
    Center,
}

/// Standardize features by removing the mean and scaling to unit variance.
///
/// Uses the population standard deviation. Parameters are set once by
/// `fit` and never touched by `transform`.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
    pub policy: ConstantFeaturePolicy,
    feature_names: Vec<String>,
}

impl StandardScaler {
    pub fn new(policy: ConstantFeaturePolicy) -> Self {
        StandardScaler {
            mean: None,
            std: None,
            policy,
            feature_names: Vec::new(),
        }
    }

    /// Names used in error messages; defaults to `x0, x1, …`.
    pub fn with_feature_names(mut self, names: &[&str]) -> Self {
        self.feature_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Compute mean and std from training data `[samples, features]`.
    pub fn fit(&mut self, x: &Matrix) -> PreprocessResult<()> {
        if x.n_rows() == 0 {
            return Err(PreprocessError::EmptyInput("StandardScaler"));
        }
        let mean = x.mean_axis0();
        let std = x.std_axis0();
        debug!(features = x.n_cols(), samples = x.n_rows(), "fitted scaler");
        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    fn params(&self) -> PreprocessResult<(&[f64], &[f64])> {
        match (&self.mean, &self.std) {
            (Some(m), Some(s)) => Ok((m.as_slice(), s.as_slice())),
            _ => Err(PreprocessError::NotFitted("StandardScaler")),
        }
    }

    fn is_degenerate(mean: f64, std: f64) -> bool {
        std <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
    }

    fn feature_name(&self, index: usize) -> String {
        self.feature_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("x{index}"))
    }

    /// Effective divisor per feature, after applying the policy.
    fn scales(&self) -> PreprocessResult<Vec<f64>> {
        let (mean, std) = self.params()?;
        mean.iter()
            .zip(std)
            .enumerate()
            .map(|(j, (&mu, &sd))| {
                if !Self::is_degenerate(mu, sd) {
                    return Ok(sd);
                }
                match self.policy {
                    ConstantFeaturePolicy::Center => Ok(1.0),
                    ConstantFeaturePolicy::Reject => Err(DegenerateFeatureError {
                        feature: self.feature_name(j),
                        index: j,
                        value: mu,
                    }
                    .into()),
                }
            })
            .collect()
    }

    fn check_width(&self, x: &Matrix) -> PreprocessResult<()> {
        let (mean, _) = self.params()?;
        if x.n_cols() != mean.len() {
            return Err(PreprocessError::DimensionMismatch {
                expected: mean.len(),
                got: x.n_cols(),
            });
        }
        Ok(())
    }

    /// `(x - mean) / std` using the fitted parameters.
    pub fn transform(&self, x: &Matrix) -> PreprocessResult<Matrix> {
        self.check_width(x)?;
        let (mean, _) = self.params()?;
        let scales = self.scales()?;
        Ok(x.map_indexed(|j, v| (v - mean[j]) / scales[j]))
    }

    /// `x * std + mean`, undoing `transform`.
    pub fn inverse_transform(&self, x: &Matrix) -> PreprocessResult<Matrix> {
        self.check_width(x)?;
        let (mean, _) = self.params()?;
        let scales = self.scales()?;
        Ok(x.map_indexed(|j, v| v * scales[j] + mean[j]))
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Matrix) -> PreprocessResult<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new(ConstantFeaturePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Matrix {
        Matrix::from_rows(&[
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 9.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let mut scaler = StandardScaler::default();
        let transformed = scaler.fit_transform(&sample()).unwrap();

        let mean = transformed.mean_axis0();
        let std = transformed.std_axis0();
        for j in 0..2 {
            assert_abs_diff_eq!(mean[j], 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(std[j], 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_round_trip() {
        let x = sample();
        let mut scaler = StandardScaler::default();
        let scaled = scaler.fit_transform(&x).unwrap();
        let back = scaler.inverse_transform(&scaled).unwrap();
        for (a, b) in back.data().iter().zip(x.data()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_transform_uses_fitted_params_only() {
        let mut scaler = StandardScaler::default();
        scaler.fit(&sample()).unwrap();
        let before = scaler.mean.clone();
        let other = Matrix::from_rows(&[vec![100.0, -5.0], vec![7.0, 7.0]]).unwrap();
        let out = scaler.transform(&other).unwrap();
        assert_eq!(scaler.mean, before);
        // (100 - 3) / sqrt(8/3)
        assert_abs_diff_eq!(out.get(0, 0).unwrap(), 97.0 / (8.0f64 / 3.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_zero_variance_rejected() {
        let x = Matrix::from_rows(&[vec![1.0, 0.0], vec![2.0, 0.0]]).unwrap();
        let mut scaler = StandardScaler::default().with_feature_names(&["Age", "SibSp"]);
        let err = scaler.fit_transform(&x).unwrap_err();
        assert_eq!(
            err,
            PreprocessError::DegenerateFeature(DegenerateFeatureError {
                feature: "SibSp".into(),
                index: 1,
                value: 0.0,
            })
        );
    }

    #[test]
    fn test_zero_variance_centered() {
        let x = Matrix::from_rows(&[vec![1.0, 4.0], vec![2.0, 4.0]]).unwrap();
        let mut scaler = StandardScaler::new(ConstantFeaturePolicy::Center);
        let out = scaler.fit_transform(&x).unwrap();
        assert_eq!(out.col(1).unwrap(), vec![0.0, 0.0]);
        assert!(out.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_round_trip_centered_constant_feature() {
        let x = Matrix::from_rows(&[vec![1.0, 4.0, 0.0], vec![2.0, 4.0, 1.0], vec![6.0, 4.0, 1.0]])
            .unwrap();
        let mut scaler = StandardScaler::new(ConstantFeaturePolicy::Center);
        let scaled = scaler.fit_transform(&x).unwrap();
        assert_eq!(scaled.col(1).unwrap(), vec![0.0, 0.0, 0.0]);

        let back = scaler.inverse_transform(&scaled).unwrap();
        for (a, b) in back.data().iter().zip(x.data()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_not_fitted_and_width() {
        let scaler = StandardScaler::default();
        assert!(matches!(
            scaler.transform(&sample()),
            Err(PreprocessError::NotFitted(_))
        ));

        let mut scaler = StandardScaler::default();
        scaler.fit(&sample()).unwrap();
        let narrow = Matrix::from_rows(&[vec![1.0]]).unwrap();
        assert!(matches!(
            scaler.transform(&narrow),
            Err(PreprocessError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }
}
