//! Loading the trained artifact pair and turning wine samples into quality predictions.
//!
//! A [`Predictor`] owns the scaler and forest exactly as the trainer wrote them. Inference only
//! ever applies the stored statistics; nothing here refits.

pub mod artifacts;

pub use artifacts::{
    ArtifactError, ArtifactKind, ArtifactPaths, DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE,
    load_model, load_scaler, save_model, save_pair, save_scaler,
};

use crate::ml::forest::RandomForestModel;
use crate::ml::scaler::StandardScaler;
use crate::wine::{FEATURE_COLUMNS, FEATURE_COUNT, QualityTier, WineSample, round_quality};

/// Outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw ensemble output.
    pub score: f64,
    /// Score rounded to two decimals.
    pub rounded: f64,
    /// Tier derived from the rounded score.
    pub tier: QualityTier,
}

impl Prediction {
    pub fn from_score(score: f64) -> Self {
        let rounded = round_quality(score);
        Self {
            score,
            rounded,
            tier: QualityTier::classify(rounded),
        }
    }
}

/// Fitted scaler plus forest, applied in sequence.
#[derive(Debug, Clone)]
pub struct Predictor {
    scaler: StandardScaler,
    model: RandomForestModel,
}

impl Predictor {
    /// Pair a scaler with a model fit on the same feature layout.
    pub fn new(scaler: StandardScaler, model: RandomForestModel) -> Result<Self, ArtifactError> {
        if scaler.n_features() != model.n_features {
            return Err(ArtifactError::SchemaMismatch(format!(
                "scaler has {} features, model has {}",
                scaler.n_features(),
                model.n_features
            )));
        }
        if scaler.feature_names != model.feature_names {
            return Err(ArtifactError::SchemaMismatch(
                "scaler and model list different feature columns".to_string(),
            ));
        }
        Ok(Self { scaler, model })
    }

    /// Load both artifacts and check they describe the wine feature layout.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let scaler = load_scaler(&paths.scaler)?;
        let model = load_model(&paths.model)?;
        let predictor = Self::new(scaler, model)?;
        predictor.ensure_wine_schema()?;
        tracing::info!(
            "Loaded {} trees from {} and scaler from {}",
            predictor.model.n_trees(),
            paths.model.display(),
            paths.scaler.display()
        );
        Ok(predictor)
    }

    /// Write both artifacts; the previous pair stays in place if either write fails.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        save_pair(paths, &self.scaler, &self.model)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &RandomForestModel {
        &self.model
    }

    /// Verify the artifacts were trained on [`FEATURE_COLUMNS`] in order.
    pub fn ensure_wine_schema(&self) -> Result<(), ArtifactError> {
        let matches = self.scaler.feature_names.len() == FEATURE_COUNT
            && self
                .scaler
                .feature_names
                .iter()
                .zip(FEATURE_COLUMNS.iter())
                .all(|(name, expected)| name.as_str() == *expected);
        if matches {
            Ok(())
        } else {
            Err(ArtifactError::SchemaMismatch(format!(
                "expected columns [{}], artifacts have [{}]",
                FEATURE_COLUMNS.join(", "),
                self.scaler.feature_names.join(", ")
            )))
        }
    }

    /// Scale an unscaled feature vector and run the forest on it.
    pub fn predict_raw(&self, features: &[f64]) -> Result<f64, ArtifactError> {
        let scaled =
            self.scaler
                .transform_row(features)
                .map_err(|_| ArtifactError::FeatureCount {
                    expected: self.scaler.n_features(),
                    actual: features.len(),
                })?;
        Ok(self.model.predict(&scaled))
    }

    /// Predict, round and classify one wine.
    pub fn predict(&self, sample: &WineSample) -> Result<Prediction, ArtifactError> {
        self.predict_raw(sample.as_slice()).map(Prediction::from_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{ForestOptions, train_random_forest};

    fn wine_names() -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|name| name.to_string()).collect()
    }

    fn tiny_predictor(names: Vec<String>) -> Predictor {
        let x: Vec<Vec<f64>> = (0..12)
            .map(|i| (0..names.len()).map(|j| (i * (j + 1)) as f64).collect())
            .collect();
        let y: Vec<f64> = (0..12).map(|i| 3.0 + (i % 6) as f64).collect();
        let scaler = StandardScaler::fit(&x, &names).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        let options = ForestOptions {
            n_trees: 5,
            ..ForestOptions::default()
        };
        let model = train_random_forest(&scaled, &y, &names, &options).unwrap();
        Predictor::new(scaler, model).unwrap()
    }

    #[test]
    fn prediction_rounds_before_classifying() {
        let prediction = Prediction::from_score(6.996);
        assert_eq!(prediction.rounded, 7.0);
        assert_eq!(prediction.tier, QualityTier::High);
        assert_eq!(Prediction::from_score(4.99).tier, QualityTier::Low);
    }

    #[test]
    fn rejects_wrong_feature_count() {
        let predictor = tiny_predictor(wine_names());
        predictor.ensure_wine_schema().unwrap();
        assert!(matches!(
            predictor.predict_raw(&[1.0, 2.0]).unwrap_err(),
            ArtifactError::FeatureCount {
                expected: 11,
                actual: 2
            }
        ));
        let prediction = predictor.predict(&WineSample::defaults()).unwrap();
        assert!(prediction.score >= 3.0 && prediction.score <= 8.0);
    }

    #[test]
    fn schema_mismatches_are_detected() {
        let foreign = tiny_predictor(vec!["a".into(), "b".into()]);
        assert!(matches!(
            foreign.ensure_wine_schema().unwrap_err(),
            ArtifactError::SchemaMismatch(_)
        ));

        let wine = tiny_predictor(wine_names());
        let result = Predictor::new(foreign.scaler().clone(), wine.model().clone());
        assert!(matches!(result, Err(ArtifactError::SchemaMismatch(_))));
    }
}
