use std::path::PathBuf;

use crate::inference::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};

/// Smallest accepted held-out share.
pub const MIN_TEST_FRACTION: f64 = 0.05;
/// Largest accepted held-out share.
pub const MAX_TEST_FRACTION: f64 = 0.5;
pub(super) const MAX_TREES: usize = 10_000;

pub(super) fn clamp_test_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_TEST_FRACTION, MAX_TEST_FRACTION)
    } else {
        default_test_fraction()
    }
}

pub(super) fn clamp_tree_count(value: usize) -> usize {
    value.clamp(1, MAX_TREES)
}

pub(super) fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_FILE)
}

pub(super) fn default_scaler_path() -> PathBuf {
    PathBuf::from(DEFAULT_SCALER_FILE)
}

pub(super) fn default_dataset_path() -> PathBuf {
    PathBuf::from("winequality-red.csv")
}

pub(super) fn default_test_fraction() -> f64 {
    0.2
}

pub(super) fn default_seed() -> u64 {
    42
}

pub(super) fn default_tree_count() -> usize {
    250
}

pub(super) fn default_min_samples_split() -> usize {
    2
}

pub(super) fn default_min_samples_leaf() -> usize {
    1
}
