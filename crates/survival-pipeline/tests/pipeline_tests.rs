//! End-to-end runs over the CSV fixtures.

use approx::assert_abs_diff_eq;
use std::path::PathBuf;
use survival_io::LoadError;
use survival_pipeline::{
    clean_table, load_table, passenger_schema, run, train_schema, Encoders, PipelineConfig,
    PipelineError,
};
use survival_preprocessing::{median, CleaningPlan};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.train = fixture("train.csv");
    config.paths.test = fixture("test.csv");
    config.paths.reference = fixture("gender_submission.csv");
    config
}

#[test]
fn test_full_run() {
    let report = run(&fixture_config()).unwrap();

    assert_eq!(report.train.loaded.shape(), (19, 12));
    assert!(report.train.loaded.columns.contains(&"Cabin".to_string()));
    assert_eq!(report.train.cleaning.dropped, vec!["Cabin".to_string()]);
    assert!(report
        .train
        .cleaning
        .missing_after
        .iter()
        .all(|(_, n)| *n == 0));
    assert!(report.train.encoded.columns.contains(&"Embarked_Q".to_string()));
    assert!(!report.train.encoded.columns.contains(&"Embarked".to_string()));
    assert_eq!(report.train.features_shape, (19, 8));

    assert!(report.training.accuracy > 0.7);
    assert_eq!(report.training.confusion.total(), 19);

    assert_eq!(report.test.loaded.shape(), (8, 11));
    assert_eq!(report.test.features_shape, (8, 8));
    assert_eq!(report.evaluation.predictions.len(), 8);
    assert_eq!(report.preview_predictions().len(), 8);
    assert_eq!(report.evaluation.reference_rows, 8);

    // 1044 has no reference row and 2000 has no prediction.
    let agreement = report.evaluation.agreement;
    assert_eq!(agreement.joined, 7);
    let expected: &[(i64, u8)] = &[
        (892, 0),
        (893, 1),
        (894, 0),
        (895, 0),
        (896, 1),
        (897, 0),
        (902, 0),
    ];
    let matched = report
        .evaluation
        .predictions
        .iter()
        .filter(|p| expected.contains(p))
        .count();
    assert_eq!(agreement.matched, matched);
    assert_abs_diff_eq!(agreement.score, matched as f64 / 7.0, epsilon = 1e-12);
}

#[test]
fn test_runs_are_deterministic() {
    let config = fixture_config();
    let a = run(&config).unwrap();
    let b = run(&config).unwrap();
    assert_eq!(a.evaluation.predictions, b.evaluation.predictions);
    assert_eq!(a.training.accuracy, b.training.accuracy);
    assert_eq!(a.evaluation.agreement, b.evaluation.agreement);
}

#[test]
fn test_missing_age_uses_test_median() {
    let train = load_table(&fixture("train.csv"), &train_schema()).unwrap();
    let test = load_table(&fixture("test.csv"), &passenger_schema()).unwrap();
    let train_median = median(train.numeric("Age").unwrap()).unwrap();
    let test_median = median(test.numeric("Age").unwrap()).unwrap();
    assert_eq!(train_median, 27.0);
    assert_eq!(test_median, 34.5);

    let (cleaned, report) = clean_table(&test, &CleaningPlan::test()).unwrap();
    // row 6 is PassengerId 902, whose age is missing
    assert_eq!(cleaned.numeric("Age").unwrap()[6], Some(test_median));
    assert_eq!(cleaned.numeric("Fare").unwrap()[7], Some(8.6625));
    assert_eq!(report.fills.len(), 2);
}

#[test]
fn test_clean_and_encode_twice_is_noop() {
    let config = PipelineConfig::default();
    let encoders = Encoders::from_config(&config.encoding).unwrap();
    let raw = load_table(&fixture("train.csv"), &train_schema()).unwrap();

    let (cleaned, _) = clean_table(&raw, &config.cleaning.train).unwrap();
    let once = encoders.encode(&cleaned).unwrap();
    let (recleaned, report) = clean_table(&once, &config.cleaning.train).unwrap();
    let twice = encoders.encode(&recleaned).unwrap();

    assert!(report.fills.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn test_missing_input_file() {
    let mut config = fixture_config();
    config.paths.test = fixture("nope.csv");
    let err = run(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Load(LoadError::Io { .. })));
}

#[test]
fn test_missing_required_column() {
    let mut config = fixture_config();
    config.paths.train = fixture("train_no_fare.csv");
    match run(&config).unwrap_err() {
        PipelineError::Load(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "Fare"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_test_port_is_an_encoding_error() {
    let mut config = fixture_config();
    config.paths.test = fixture("test_missing_port.csv");
    let err = run(&config).unwrap_err();
    let encoding = err.as_encoding().unwrap();
    assert_eq!(encoding.column, "Embarked");
    assert_eq!(encoding.row, 1);
    assert_eq!(encoding.value, None);
}
