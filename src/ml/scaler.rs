//! Per-feature standardization fit once on training rows.

use serde::{Deserialize, Serialize};

/// Format version written into scaler artifacts.
pub const SCALER_VERSION: i64 = 1;

/// Scales below this are treated as constant features and left unscaled.
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Zero-mean, unit-variance transform with statistics frozen at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Scaler format version.
    pub model_version: i64,
    /// Feature labels in the order the statistics were computed.
    pub feature_names: Vec<String>,
    /// Per-feature mean.
    pub mean: Vec<f64>,
    /// Per-feature population variance.
    pub var: Vec<f64>,
    /// Per-feature divisor (`sqrt(var)`, or `1.0` for constant features).
    pub scale: Vec<f64>,
    /// Number of rows the statistics were computed from.
    pub n_samples_seen: usize,
}

impl StandardScaler {
    /// Compute mean and variance of each column.
    pub fn fit(rows: &[Vec<f64>], feature_names: &[String]) -> Result<Self, String> {
        if rows.is_empty() {
            return Err("Cannot fit scaler on an empty dataset".to_string());
        }
        let d = feature_names.len();
        if d == 0 {
            return Err("Cannot fit scaler without features".to_string());
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != d {
                return Err(format!(
                    "Row {idx} has {} values but expected {d}",
                    row.len()
                ));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(format!("Row {idx} contains a non-finite value"));
            }
        }

        let n = rows.len() as f64;
        let mut mean = vec![0.0f64; d];
        for row in rows {
            for (acc, &value) in mean.iter_mut().zip(row) {
                *acc += value;
            }
        }
        for value in &mut mean {
            *value /= n;
        }

        let mut var = vec![0.0f64; d];
        for row in rows {
            for i in 0..d {
                let diff = row[i] - mean[i];
                var[i] += diff * diff;
            }
        }
        for value in &mut var {
            *value /= n;
        }

        let scale = var
            .iter()
            .map(|&v| {
                let std = v.sqrt();
                if std < MIN_SCALE { 1.0 } else { std }
            })
            .collect();

        Ok(Self {
            model_version: SCALER_VERSION,
            feature_names: feature_names.to_vec(),
            mean,
            var,
            scale,
            n_samples_seen: rows.len(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one row with the fitted statistics.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, String> {
        if row.len() != self.n_features() {
            return Err(format!(
                "Scaler expects {} features but got {}",
                self.n_features(),
                row.len()
            ));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&value, (&mean, &scale))| (value - mean) / scale)
            .collect())
    }

    /// Standardize every row with the fitted statistics.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, String> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Validate structural invariants of the scaler.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_version != SCALER_VERSION {
            return Err(format!(
                "Unsupported scaler version {} (expected {SCALER_VERSION})",
                self.model_version
            ));
        }
        let d = self.mean.len();
        if d == 0 {
            return Err("Scaler has no features".to_string());
        }
        if self.var.len() != d || self.scale.len() != d || self.feature_names.len() != d {
            return Err("Scaler statistics length mismatch".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err("Scaler scale values must be finite and > 0".to_string());
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("Scaler mean values must be finite".to_string());
        }
        Ok(())
    }
}
