use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::inference::ArtifactPaths;
use crate::ml::forest::ForestOptions;

use super::defaults::{
    clamp_test_fraction, clamp_tree_count, default_dataset_path, default_min_samples_leaf,
    default_min_samples_split, default_model_path, default_scaler_path, default_seed,
    default_test_fraction, default_tree_count,
};

/// Settings loaded from `config.toml`.
///
/// Config keys (TOML): `artifacts`, `training`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub training: TrainingSettings,
}

impl AppConfig {
    pub(super) fn normalized(mut self) -> Self {
        self.training = self.training.normalized();
        self
    }

    /// Artifact locations shared by the trainer and the predictor.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(
            self.artifacts.model_path.clone(),
            self.artifacts.scaler_path.clone(),
        )
    }
}

/// Where the trainer writes and the predictor reads artifacts.
///
/// Config keys: `model_path`, `scaler_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
        }
    }
}

/// Trainer inputs and forest hyperparameters.
///
/// Config keys: `dataset_path`, `test_fraction`, `seed`, `n_trees`, `max_depth`,
/// `min_samples_split`, `min_samples_leaf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Delimited training file.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Share of rows held out for evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the split and the forest.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_tree_count")]
    pub n_trees: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            n_trees: default_tree_count(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
        }
    }
}

impl TrainingSettings {
    /// Clamp out-of-range values into their accepted bounds.
    pub fn normalized(mut self) -> Self {
        let test_fraction = clamp_test_fraction(self.test_fraction);
        if test_fraction != self.test_fraction {
            tracing::warn!(
                "test_fraction {} is outside the accepted range; using {}",
                self.test_fraction,
                test_fraction
            );
        }
        self.test_fraction = test_fraction;
        let n_trees = clamp_tree_count(self.n_trees);
        if n_trees != self.n_trees {
            tracing::warn!("n_trees {} is out of range; using {}", self.n_trees, n_trees);
        }
        self.n_trees = n_trees;
        self.max_depth = self.max_depth.map(|depth| depth.max(1));
        self.min_samples_split = self.min_samples_split.max(2);
        self.min_samples_leaf = self.min_samples_leaf.max(1);
        self
    }

    /// Forest hyperparameters derived from these settings.
    pub fn forest_options(&self) -> ForestOptions {
        ForestOptions {
            n_trees: self.n_trees,
            seed: self.seed,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            ..ForestOptions::default()
        }
    }
}

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No suitable config directory available")]
    NoConfigDir,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    SerializeToml(#[from] toml::ser::Error),
}
