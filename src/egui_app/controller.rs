use std::sync::OnceLock;

use crate::inference::{ArtifactPaths, Prediction, Predictor};

use super::state::FormState;

/// Owns the form values and the lazily loaded artifact pair.
///
/// Artifacts are read from disk on first use and reused for every later prediction, including
/// after a failed load: the error is kept and reported again rather than retried.
pub struct PredictorController {
    paths: ArtifactPaths,
    predictor: OnceLock<Result<Predictor, String>>,
    /// Current input values.
    pub form: FormState,
    last: Option<Prediction>,
}

impl PredictorController {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            predictor: OnceLock::new(),
            form: FormState::default(),
            last: None,
        }
    }

    /// Controller wrapping an already fitted predictor.
    pub fn with_predictor(paths: ArtifactPaths, predictor: Predictor) -> Self {
        let controller = Self::new(paths);
        let _ = controller.predictor.set(Ok(predictor));
        controller
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Cached predictor, loading it on the first call.
    pub fn predictor(&self) -> Result<&Predictor, &str> {
        self.predictor
            .get_or_init(|| {
                Predictor::load(&self.paths).map_err(|err| {
                    tracing::error!("Failed to load artifacts: {err}");
                    err.to_string()
                })
            })
            .as_ref()
            .map_err(String::as_str)
    }

    /// Load the artifacts now so the window can report problems before the first click.
    pub fn ensure_loaded(&self) -> Result<(), String> {
        self.predictor().map(|_| ()).map_err(str::to_string)
    }

    /// Update one field; a change invalidates the shown prediction.
    pub fn set_field(&mut self, index: usize, value: f64) {
        if self.form.set(index, value) {
            self.last = None;
        }
    }

    /// Run the form through the cached predictor and remember the result.
    pub fn predict(&mut self) -> Result<Prediction, String> {
        let sample = self.form.sample();
        let prediction = self
            .predictor()
            .map_err(str::to_string)?
            .predict(&sample)
            .map_err(|err| err.to_string())?;
        tracing::debug!(
            "Predicted {:.4} ({:?}) for {:?}",
            prediction.score,
            prediction.tier,
            sample.values
        );
        self.last = Some(prediction);
        Ok(prediction)
    }

    pub fn last_prediction(&self) -> Option<Prediction> {
        self.last
    }

    /// Restore default inputs and clear the shown prediction.
    pub fn reset(&mut self) {
        self.form.reset();
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{ForestOptions, train_random_forest};
    use crate::ml::scaler::StandardScaler;
    use crate::wine::{FEATURE_COLUMNS, WineSample};
    use tempfile::tempdir;

    fn wine_predictor() -> Predictor {
        let names: Vec<String> = FEATURE_COLUMNS.iter().map(|name| name.to_string()).collect();
        let base = WineSample::defaults().values;
        let x: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let mut row = base.to_vec();
                row[10] = 8.5 + (i % 10) as f64 * 0.5;
                row[1] = 0.3 + (i % 5) as f64 * 0.1;
                row
            })
            .collect();
        let y: Vec<f64> = x.iter().map(|row| row[10] * 0.6 - row[1] * 2.0).collect();
        let scaler = StandardScaler::fit(&x, &names).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        let options = ForestOptions {
            n_trees: 10,
            ..ForestOptions::default()
        };
        let model = train_random_forest(&scaled, &y, &names, &options).unwrap();
        Predictor::new(scaler, model).unwrap()
    }

    #[test]
    fn loads_artifacts_once_and_reuses_them() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        wine_predictor().save(&paths).unwrap();

        let mut controller = PredictorController::new(paths.clone());
        controller.ensure_loaded().unwrap();
        let first = controller.predictor().unwrap() as *const Predictor;
        std::fs::remove_file(&paths.model).unwrap();
        std::fs::remove_file(&paths.scaler).unwrap();

        let prediction = controller.predict().unwrap();
        assert!(std::ptr::eq(first, controller.predictor().unwrap()));
        assert_eq!(controller.last_prediction(), Some(prediction));
    }

    #[test]
    fn missing_artifacts_report_an_error() {
        let dir = tempdir().unwrap();
        let mut controller = PredictorController::new(ArtifactPaths::in_dir(dir.path()));
        let err = controller.predict().unwrap_err();
        assert!(err.contains("not found"), "{err}");
        assert!(controller.last_prediction().is_none());
    }

    #[test]
    fn editing_a_field_clears_the_prediction() {
        let dir = tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let mut controller = PredictorController::with_predictor(paths, wine_predictor());
        let before = controller.predict().unwrap();
        controller.set_field(10, controller.form.value(10));
        assert_eq!(controller.last_prediction(), Some(before));

        controller.set_field(10, 13.5);
        assert!(controller.last_prediction().is_none());
        let after = controller.predict().unwrap();
        assert_ne!(before.score, after.score);

        controller.reset();
        assert!(controller.last_prediction().is_none());
        assert_eq!(controller.form, FormState::default());
    }
}
