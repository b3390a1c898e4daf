//! Run configuration.
//!
//! Every section has defaults reproducing the standard run, so an empty
//! JSON object (or no file at all) is a valid configuration.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use survival_preprocessing::{BinaryEncoder, CleaningPlan, ConstantFeaturePolicy, OneHotEncoder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub reference: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            train: PathBuf::from("/data/train.csv"),
            test: PathBuf::from("/data/test.csv"),
            reference: PathBuf::from("/data/gender_submission.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub train: CleaningPlan,
    pub test: CleaningPlan,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        CleaningConfig {
            train: CleaningPlan::train(),
            test: CleaningPlan::test(),
        }
    }
}

/// Category vocabularies. Fixed here rather than inferred from the data so
/// train and test always encode to the same columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub sex_column: String,
    /// Encoded as 0.
    pub sex_negative: String,
    /// Encoded as 1.
    pub sex_positive: String,
    pub embarked_column: String,
    pub embarked_vocabulary: Vec<String>,
    /// Level dropped from the indicator columns.
    pub embarked_reference: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        EncodingConfig {
            sex_column: "Sex".to_string(),
            sex_negative: "male".to_string(),
            sex_positive: "female".to_string(),
            embarked_column: "Embarked".to_string(),
            embarked_vocabulary: vec!["C".to_string(), "Q".to_string(), "S".to_string()],
            embarked_reference: "C".to_string(),
        }
    }
}

impl EncodingConfig {
    pub fn sex_encoder(&self) -> PipelineResult<BinaryEncoder> {
        Ok(BinaryEncoder::new(
            &self.sex_column,
            &self.sex_negative,
            &self.sex_positive,
        )?)
    }

    pub fn embarked_encoder(&self) -> PipelineResult<OneHotEncoder> {
        Ok(OneHotEncoder::new(
            &self.embarked_column,
            &self.embarked_vocabulary,
            &self.embarked_reference,
        )?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    pub constant_features: ConstantFeaturePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tol: f64,
    /// Inverse L2 regularisation strength.
    pub c: f64,
    pub seed: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-4,
            c: 1.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// How many test predictions to show.
    pub preview: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { preview: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: InputPaths,
    pub cleaning: CleaningConfig,
    pub encoding: EncodingConfig,
    pub scaler: ScalerConfig,
    pub model: ModelConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        // The encoder constructors carry the vocabulary checks.
        self.encoding
            .sex_encoder()
            .and_then(|_| self.encoding.embarked_encoder())
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;

        let m = &self.model;
        if m.max_iter == 0 {
            return Err(PipelineError::InvalidConfig("model.max_iter must be > 0".into()));
        }
        if m.learning_rate.is_nan() || m.learning_rate <= 0.0 {
            return Err(PipelineError::InvalidConfig(
                "model.learning_rate must be > 0".into(),
            ));
        }
        if m.c.is_nan() || m.c <= 0.0 {
            return Err(PipelineError::InvalidConfig("model.c must be > 0".into()));
        }
        if m.tol.is_nan() || m.tol < 0.0 {
            return Err(PipelineError::InvalidConfig("model.tol must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_preprocessing::FillStrategy;

    #[test]
    fn test_empty_json_is_default() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.report.preview, 10);
        assert_eq!(config.encoding.embarked_reference, "C");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "paths": { "train": "fixtures/train.csv" },
            "scaler": { "constant_features": "center" },
            "cleaning": { "test": { "fill": [ { "column": "Embarked", "strategy": "mode" } ] } }
        }"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.paths.train, PathBuf::from("fixtures/train.csv"));
        assert_eq!(config.paths.test, PathBuf::from("/data/test.csv"));
        assert_eq!(config.scaler.constant_features, ConstantFeaturePolicy::Center);
        assert!(config.cleaning.test.drop.is_empty());
        assert_eq!(config.cleaning.test.fill[0].strategy, FillStrategy::Mode);
    }

    #[test]
    fn test_validation() {
        let bad_reference = r#"{ "encoding": { "embarked_reference": "X" } }"#;
        match PipelineConfig::from_json(bad_reference) {
            Err(PipelineError::InvalidConfig(msg)) => assert!(msg.contains("\"X\"")),
            other => panic!("unexpected result: {other:?}"),
        }

        let same_sex = r#"{ "encoding": { "sex_positive": "male" } }"#;
        assert!(matches!(
            PipelineConfig::from_json(same_sex),
            Err(PipelineError::InvalidConfig(_))
        ));

        let bad_iter = r#"{ "model": { "max_iter": 0 } }"#;
        assert!(matches!(
            PipelineConfig::from_json(bad_iter),
            Err(PipelineError::InvalidConfig(_))
        ));

        let bad_c = r#"{ "model": { "c": -1.0 } }"#;
        assert!(PipelineConfig::from_json(bad_c).is_err());

        let mut config = PipelineConfig::default();
        config.model.learning_rate = f64::NAN;
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
        config.model.learning_rate = 0.1;
        config.model.tol = f64::NAN;
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_file("/no/such/config.json").unwrap_err();
        assert!(matches!(err, PipelineError::ConfigIo { .. }));
    }
}
