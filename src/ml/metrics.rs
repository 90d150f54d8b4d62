//! Evaluation metrics for regression models.

use serde::{Deserialize, Serialize};

/// Mean of squared residuals. Returns `0.0` for empty input.
pub fn mean_squared_error(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    sum / n as f64
}

/// Square root of [`mean_squared_error`].
pub fn root_mean_squared_error(truth: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(truth, predicted).sqrt()
}

/// Mean of absolute residuals. Returns `0.0` for empty input.
pub fn mean_absolute_error(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = truth.iter().zip(predicted).map(|(t, p)| (t - p).abs()).sum();
    sum / n as f64
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// A constant truth vector has no variance to explain: a perfect fit scores `1.0` and anything
/// else `0.0`.
pub fn r2_score(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let mean = truth[..n].iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = truth[..n].iter().map(|t| (t - mean) * (t - mean)).sum();
    let ss_res: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p) * (t - p))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Held-out evaluation summary printed by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub rmse: f64,
    pub r2: f64,
    pub mae: f64,
    /// Number of held-out rows evaluated.
    pub n_test: usize,
}

impl RegressionReport {
    pub fn evaluate(truth: &[f64], predicted: &[f64]) -> Self {
        Self {
            rmse: root_mean_squared_error(truth, predicted),
            r2: r2_score(truth, predicted),
            mae: mean_absolute_error(truth, predicted),
            n_test: truth.len().min(predicted.len()),
        }
    }
}
