mod support;

use support::{vintner_env::VintnerEnvGuard, wine_csv::write_wine_csv};

use tempfile::TempDir;
use vintner::{
    config::{self, TrainingSettings},
    dataset::load_table,
    inference::{ArtifactError, ArtifactPaths, Predictor},
    training,
    wine::{FEATURE_COLUMNS, WineSample},
};

struct TrainHarness {
    _temp: TempDir,
    settings: TrainingSettings,
    paths: ArtifactPaths,
}

impl TrainHarness {
    fn new(rows: usize) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let dataset = temp.path().join("winequality-red.csv");
        write_wine_csv(&dataset, rows, 7);
        let settings = TrainingSettings {
            dataset_path: dataset,
            n_trees: 40,
            ..TrainingSettings::default()
        };
        let paths = ArtifactPaths::in_dir(&temp.path().join("artifacts"));
        Self {
            _temp: temp,
            settings,
            paths,
        }
    }
}

#[test]
fn synthetic_file_uses_wine_layout() {
    let harness = TrainHarness::new(50);
    let table = load_table(&harness.settings.dataset_path).unwrap();
    assert_eq!(table.delimiter, b';');
    assert_eq!(&table.columns[..FEATURE_COLUMNS.len()], &FEATURE_COLUMNS[..]);
    assert_eq!(table.columns.last().map(String::as_str), Some("quality"));
}

#[test]
fn same_file_and_seed_give_identical_metrics() {
    let harness = TrainHarness::new(200);
    let first = training::fit(&harness.settings).unwrap();
    let second = training::fit(&harness.settings).unwrap();
    assert_eq!(first.report.rmse.to_bits(), second.report.rmse.to_bits());
    assert_eq!(first.report.r2.to_bits(), second.report.r2.to_bits());
    assert_eq!(first.n_test, 40);
    assert!(first.report.r2 > 0.3, "r2 = {}", first.report.r2);
}

#[test]
fn reloaded_artifacts_predict_identically() {
    let harness = TrainHarness::new(200);
    let outcome = training::train(&harness.settings, &harness.paths).unwrap();
    let loaded = Predictor::load(&harness.paths).unwrap();

    assert_eq!(loaded.scaler(), outcome.predictor.scaler());
    assert_eq!(loaded.scaler().n_samples_seen, outcome.n_train);
    assert_eq!(outcome.n_train + outcome.n_test, outcome.n_rows);
    let samples = [
        WineSample::defaults(),
        WineSample::clamped([7.4, 0.7, 0.0, 1.9, 0.076, 11.0, 34.0, 0.9978, 3.51, 0.56, 9.4]),
        WineSample::clamped([11.2, 0.28, 0.56, 1.9, 0.075, 17.0, 60.0, 0.998, 3.16, 0.58, 12.8]),
    ];
    for sample in &samples {
        let fitted = outcome.predictor.predict(sample).unwrap();
        let reloaded = loaded.predict(sample).unwrap();
        assert_eq!(fitted.score.to_bits(), reloaded.score.to_bits());
        assert_eq!(fitted.tier, reloaded.tier);
    }
}

#[test]
fn default_sample_predicts_one_stable_score() {
    let harness = TrainHarness::new(200);
    training::train(&harness.settings, &harness.paths).unwrap();
    let first = Predictor::load(&harness.paths).unwrap();
    let second = Predictor::load(&harness.paths).unwrap();
    let sample = WineSample::defaults();

    let a = first.predict(&sample).unwrap();
    let b = first.predict(&sample).unwrap();
    let c = second.predict(&sample).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!((0.0..=10.0).contains(&a.score));
}

#[test]
fn permuted_features_change_the_prediction() {
    let harness = TrainHarness::new(200);
    let outcome = training::fit(&harness.settings).unwrap();
    let mut values = WineSample::clamped([
        8.0, 0.3, 0.3, 2.5, 0.08, 15.0, 46.0, 0.9968, 3.3, 0.6, 12.5,
    ])
    .values;
    let ordered = outcome.predictor.predict_raw(&values).unwrap();
    values.swap(1, 10);
    let swapped = outcome.predictor.predict_raw(&values).unwrap();
    assert_ne!(ordered, swapped);
}

#[test]
fn missing_artifacts_are_reported() {
    let temp = tempfile::tempdir().unwrap();
    let err = Predictor::load(&ArtifactPaths::in_dir(temp.path())).unwrap_err();
    assert!(matches!(err, ArtifactError::Missing { .. }));
}

#[test]
fn config_in_app_dir_drives_artifact_paths() {
    let temp = tempfile::tempdir().unwrap();
    let _env = VintnerEnvGuard::set_config_home(temp.path().to_path_buf());
    let path = config::config_path().unwrap();
    assert!(path.starts_with(temp.path().join(".vintner")));
    std::fs::write(
        &path,
        "[artifacts]\nmodel_path = \"out/forest.json\"\n\n[training]\nn_trees = 0\n",
    )
    .unwrap();

    let loaded = config::load_or_default().unwrap();
    assert_eq!(
        loaded.artifact_paths().model,
        std::path::PathBuf::from("out/forest.json")
    );
    assert_eq!(loaded.artifact_paths().scaler, std::path::PathBuf::from("scaler.json"));
    assert_eq!(loaded.training.n_trees, 1);
    assert_eq!(loaded.training.seed, 42);
}
