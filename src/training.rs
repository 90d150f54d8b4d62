//! Trainer pipeline: table → split → scaler → forest → metrics → artifacts.
//!
//! Any failure aborts the run; nothing is retried and no artifact is written unless every step
//! before persisting succeeded.

use std::time::Instant;

use thiserror::Error;

use crate::config::TrainingSettings;
use crate::dataset::{DatasetLoadError, load_table, train_test_split};
use crate::inference::{ArtifactError, ArtifactPaths, Predictor};
use crate::ml::forest::train_random_forest;
use crate::ml::metrics::RegressionReport;
use crate::ml::scaler::StandardScaler;
use crate::wine::{FEATURE_COLUMNS, TARGET_COLUMN};

/// Rows kept for the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),
    #[error("Failed to fit scaler: {0}")]
    Scaler(String),
    #[error("Failed to fit forest: {0}")]
    Forest(String),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Everything the trainer reports after a successful fit.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Normalized labels of every column in the file.
    pub columns: Vec<String>,
    /// Separator detected for the file.
    pub delimiter: u8,
    /// First rows of the table, all columns.
    pub preview: Vec<Vec<f64>>,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Held-out metrics on the scaled test split.
    pub report: RegressionReport,
    /// `(feature, importance)` sorted by decreasing importance.
    pub importances: Vec<(String, f64)>,
    /// Fitted scaler and forest.
    pub predictor: Predictor,
}

/// Fit and persist the artifact pair.
pub fn train(
    settings: &TrainingSettings,
    paths: &ArtifactPaths,
) -> Result<TrainingOutcome, TrainError> {
    let outcome = fit(settings)?;
    outcome.predictor.save(paths)?;
    tracing::info!(
        "Saved model to {} and scaler to {}",
        paths.model.display(),
        paths.scaler.display()
    );
    Ok(outcome)
}

/// Run every training step except persisting the artifacts.
pub fn fit(settings: &TrainingSettings) -> Result<TrainingOutcome, TrainError> {
    let started = Instant::now();
    let table = load_table(&settings.dataset_path)?;
    tracing::info!(
        "Loaded {} rows from {} (delimiter {:?})",
        table.rows.len(),
        settings.dataset_path.display(),
        table.delimiter as char
    );
    tracing::info!("Detected columns: {:?}", table.columns);

    let labeled = table.split_target(TARGET_COLUMN)?;
    if labeled.feature_names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
        tracing::warn!(
            "Feature columns differ from the predictor form layout; \
             the predictor will refuse these artifacts"
        );
    }

    let (train, test) = train_test_split(&labeled, settings.test_fraction, settings.seed)?;
    tracing::info!("Split {} train / {} test rows", train.len(), test.len());

    let scaler =
        StandardScaler::fit(&train.x, &train.feature_names).map_err(TrainError::Scaler)?;
    let train_scaled = scaler.transform(&train.x).map_err(TrainError::Scaler)?;
    let test_scaled = scaler.transform(&test.x).map_err(TrainError::Scaler)?;

    let options = settings.forest_options();
    let model = train_random_forest(&train_scaled, &train.y, &train.feature_names, &options)
        .map_err(TrainError::Forest)?;
    let report = RegressionReport::evaluate(&test.y, &model.predict_many(&test_scaled));
    tracing::info!(
        "Fit {} trees in {:.2?}; rmse={:.4} r2={:.4}",
        model.n_trees(),
        started.elapsed(),
        report.rmse,
        report.r2
    );

    let mut importances: Vec<(String, f64)> = model
        .feature_names
        .iter()
        .cloned()
        .zip(model.feature_importances.iter().copied())
        .collect();
    importances.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(TrainingOutcome {
        preview: table.head(PREVIEW_ROWS).to_vec(),
        n_rows: table.rows.len(),
        columns: table.columns,
        delimiter: table.delimiter,
        n_train: train.len(),
        n_test: test.len(),
        report,
        importances,
        predictor: Predictor::new(scaler, model)?,
    })
}
