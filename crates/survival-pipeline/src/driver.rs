//! End-to-end run: load, clean, encode, train, evaluate.

use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::pipeline::Pipeline;
use crate::stages::{
    clean_table, feature_matrix, labels, load_table, passenger_ids, passenger_schema,
    train_schema, Encoders, TableSummary,
};
use survival_core::DataFrame;
use survival_io::{read_reference_labels, ReferenceLabel};
use survival_linear::LogisticRegression;
use survival_metrics::{
    accuracy, agreement, class_scores, confusion_matrix, Agreement, ClassScores, ConfusionMatrix,
};
use survival_preprocessing::{CleaningReport, StandardScaler};
use tracing::info;

/// Everything observed while processing one table.
#[derive(Debug, Clone)]
pub struct TableStages {
    pub loaded: TableSummary,
    pub cleaning: CleaningReport,
    pub encoded: TableSummary,
    pub features_shape: (usize, usize),
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub survived: ClassScores,
    pub iterations: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// `(PassengerId, predicted label)` in test-table order.
    pub predictions: Vec<(i64, u8)>,
    pub reference_rows: usize,
    pub agreement: Agreement,
}

/// The results of a run, in the order they were produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub features: Vec<String>,
    pub train: TableStages,
    pub training: TrainingReport,
    pub test: TableStages,
    pub evaluation: EvaluationReport,
    pub preview: usize,
}

impl RunReport {
    /// The first `preview` test predictions.
    pub fn preview_predictions(&self) -> &[(i64, u8)] {
        let n = self.preview.min(self.evaluation.predictions.len());
        &self.evaluation.predictions[..n]
    }
}

/// The output of `TrainedModel::predict_table`.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub encoded: DataFrame,
    pub features_shape: (usize, usize),
    pub labels: Vec<u8>,
}

/// A fitted model with the encoders and feature order it was trained with.
pub struct TrainedModel {
    pub encoders: Encoders,
    pub features: Vec<String>,
    pub pipeline: Pipeline,
}

impl TrainedModel {
    /// Encode an already-cleaned table and predict one label per row.
    ///
    /// Also returns the encoded table and the shape of the feature matrix
    /// the predictions were made from.
    pub fn predict_table(&self, cleaned: &DataFrame) -> PipelineResult<Prediction> {
        let encoded = self.encoders.encode(cleaned)?;
        let x = feature_matrix(&encoded, &self.features)?;
        let labels = self.pipeline.predict(&x)?;
        Ok(Prediction {
            encoded,
            features_shape: x.shape(),
            labels,
        })
    }
}

/// Clean, encode and fit on a raw training table.
pub fn train(
    config: &PipelineConfig,
    raw: &DataFrame,
) -> PipelineResult<(TrainedModel, TableStages, TrainingReport)> {
    let encoders = Encoders::from_config(&config.encoding)?;
    let features = encoders.feature_names();

    let (cleaned, cleaning) = clean_table(raw, &config.cleaning.train)?;
    let encoded = encoders.encode(&cleaned)?;
    let x = feature_matrix(&encoded, &features)?;
    let y = labels(&encoded)?;
    let y_f: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
    info!(rows = x.n_rows(), features = x.n_cols(), "training matrix ready");

    let feature_refs: Vec<&str> = features.iter().map(String::as_str).collect();
    let scaler = StandardScaler::new(config.scaler.constant_features)
        .with_feature_names(&feature_refs);
    let m = &config.model;
    let estimator = LogisticRegression::new(m.learning_rate, m.max_iter)
        .with_tol(m.tol)
        .with_c(m.c)
        .with_seed(m.seed);
    let mut pipeline = Pipeline::new()
        .add_transformer(Box::new(scaler))
        .set_estimator(Box::new(estimator));
    pipeline.fit(&x, &y_f)?;

    let y_pred = pipeline.predict(&x)?;
    let training = TrainingReport {
        accuracy: accuracy(&y, &y_pred),
        confusion: confusion_matrix(&y, &y_pred),
        survived: class_scores(&y, &y_pred, 1),
        iterations: pipeline.n_iter(),
    };
    info!(accuracy = training.accuracy, "model trained");

    let stages = TableStages {
        loaded: TableSummary::of(raw),
        cleaning,
        encoded: TableSummary::of(&encoded),
        features_shape: x.shape(),
    };
    let model = TrainedModel {
        encoders,
        features,
        pipeline,
    };
    Ok((model, stages, training))
}

/// Clean and predict a raw test table, then score against the reference labels.
pub fn evaluate(
    config: &PipelineConfig,
    model: &TrainedModel,
    raw: &DataFrame,
    reference: &[ReferenceLabel],
) -> PipelineResult<(TableStages, EvaluationReport)> {
    let (cleaned, cleaning) = clean_table(raw, &config.cleaning.test)?;
    let prediction = model.predict_table(&cleaned)?;
    let ids = passenger_ids(&prediction.encoded)?;
    let predictions: Vec<(i64, u8)> = ids.into_iter().zip(prediction.labels).collect();

    let agreement = agreement(
        predictions.iter().copied(),
        reference.iter().map(|r| (r.passenger_id, r.survived)),
    );
    info!(
        joined = agreement.joined,
        score = agreement.score,
        "evaluated against reference labels"
    );

    let stages = TableStages {
        loaded: TableSummary::of(raw),
        cleaning,
        encoded: TableSummary::of(&prediction.encoded),
        features_shape: prediction.features_shape,
    };
    let evaluation = EvaluationReport {
        predictions,
        reference_rows: reference.len(),
        agreement,
    };
    Ok((stages, evaluation))
}

/// Run on in-memory tables.
pub fn run_frames(
    config: &PipelineConfig,
    train_raw: &DataFrame,
    test_raw: &DataFrame,
    reference: &[ReferenceLabel],
) -> PipelineResult<RunReport> {
    let (model, train_stages, training) = train(config, train_raw)?;
    let (test_stages, evaluation) = evaluate(config, &model, test_raw, reference)?;
    Ok(RunReport {
        features: model.features,
        train: train_stages,
        training,
        test: test_stages,
        evaluation,
        preview: config.report.preview,
    })
}

/// Load every input named by `config` and run the whole pipeline.
pub fn run(config: &PipelineConfig) -> PipelineResult<RunReport> {
    config.validate()?;
    let paths = &config.paths;
    let train_raw = load_table(&paths.train, &train_schema())?;
    let test_raw = load_table(&paths.test, &passenger_schema())?;
    let reference = read_reference_labels(&paths.reference)?;
    run_frames(config, &train_raw, &test_raw, &reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::Column;
    use survival_preprocessing::ConstantFeaturePolicy;

    fn text(v: &[Option<&str>]) -> Column {
        Column::Text(v.iter().map(|s| s.map(str::to_string)).collect())
    }

    /// The two-passenger table: a first-class woman who survived and a
    /// third-class man who did not.
    fn two_passengers() -> DataFrame {
        DataFrame::from_columns(vec![
            ("PassengerId", Column::dense(&[1.0, 2.0])),
            ("Survived", Column::dense(&[1.0, 0.0])),
            ("Pclass", Column::dense(&[1.0, 3.0])),
            ("Sex", text(&[Some("female"), Some("male")])),
            ("Age", Column::dense(&[29.0, 22.0])),
            ("SibSp", Column::dense(&[0.0, 0.0])),
            ("Parch", Column::dense(&[0.0, 0.0])),
            ("Fare", Column::dense(&[211.3, 7.25])),
            ("Embarked", text(&[Some("S"), Some("S")])),
        ])
        .unwrap()
    }

    fn centered_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.scaler.constant_features = ConstantFeaturePolicy::Center;
        config
    }

    #[test]
    fn test_two_passenger_scenario() {
        let config = centered_config();
        let raw = two_passengers();
        let encoders = Encoders::from_config(&config.encoding).unwrap();
        let encoded = encoders.encode(&raw).unwrap();
        assert_eq!(encoded.dense_numeric("Sex").unwrap(), vec![1.0, 0.0]);
        assert_eq!(encoded.dense_numeric("Embarked_S").unwrap(), vec![1.0, 1.0]);
        assert_eq!(encoded.dense_numeric("Embarked_Q").unwrap(), vec![0.0, 0.0]);

        let (model, _, training) = train(&config, &raw).unwrap();
        let prediction = model.predict_table(&raw).unwrap();
        assert_eq!(prediction.labels, vec![1, 0]);
        assert_eq!(prediction.features_shape, (2, 8));
        assert_eq!(training.accuracy, 1.0);
    }

    #[test]
    fn test_two_passenger_scenario_rejects_constant_features_by_default() {
        let err = match train(&PipelineConfig::default(), &two_passengers()) {
            Err(e) => e,
            Ok(_) => panic!("constant features should be rejected"),
        };
        let degenerate = err.as_degenerate_feature().unwrap();
        assert_eq!(degenerate.feature, "SibSp");
    }

    #[test]
    fn test_unknown_sex_surfaces_encoding_error() {
        let raw = two_passengers()
            .with_column("Sex", text(&[Some("female"), Some("?")]))
            .unwrap();
        let err = match train(&centered_config(), &raw) {
            Err(e) => e,
            Ok(_) => panic!("unknown category should fail"),
        };
        assert_eq!(err.as_encoding().unwrap().row, 1);
    }

    #[test]
    fn test_run_frames_joins_on_id() {
        let config = centered_config();
        let train_raw = two_passengers();
        let test_raw = two_passengers()
            .without_column("Survived")
            .with_column("PassengerId", Column::dense(&[10.0, 11.0]))
            .unwrap();
        let reference = vec![
            ReferenceLabel {
                passenger_id: 10,
                survived: 1,
            },
            ReferenceLabel {
                passenger_id: 99,
                survived: 0,
            },
        ];
        let report = run_frames(&config, &train_raw, &test_raw, &reference).unwrap();
        assert_eq!(report.evaluation.predictions, vec![(10, 1), (11, 0)]);
        assert_eq!(report.evaluation.agreement.joined, 1);
        assert_eq!(report.evaluation.agreement.score, 1.0);
        assert_eq!(report.preview_predictions().len(), 2);
        assert_eq!(report.features.len(), 8);
        assert_eq!(report.train.features_shape, (2, 8));
        assert_eq!(report.test.features_shape, (2, 8));
    }
}
