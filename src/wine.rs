//! Feature schema shared by the trainer and the predictor form.
//!
//! The column order here is the order the scaler and forest were fit with. Every vector handed
//! to a [`crate::inference::Predictor`] must follow it exactly.

/// Number of physicochemical measurements per wine.
pub const FEATURE_COUNT: usize = 11;

/// Normalized name of the target column.
pub const TARGET_COLUMN: &str = "quality";

/// Normalized feature column labels in training order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "fixed acidity",
    "volatile acidity",
    "citric acid",
    "residual sugar",
    "chlorides",
    "free sulfur dioxide",
    "total sulfur dioxide",
    "density",
    "ph",
    "sulphates",
    "alcohol",
];

/// Bounds, default and step for one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Normalized column label this field feeds.
    pub column: &'static str,
    /// Human-readable label with units.
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Decimals shown in the form.
    pub decimals: usize,
}

impl FieldSpec {
    /// Clamp a value into the field's bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Input fields in training order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        column: "fixed acidity",
        label: "Fixed Acidity (g(tartaric acid)/dm³)",
        min: 4.0,
        max: 16.0,
        default: 8.0,
        step: 0.1,
        decimals: 1,
    },
    FieldSpec {
        column: "volatile acidity",
        label: "Volatile Acidity (g(acetic acid)/dm³)",
        min: 0.10,
        max: 1.60,
        default: 0.50,
        step: 0.01,
        decimals: 2,
    },
    FieldSpec {
        column: "citric acid",
        label: "Citric Acid (g/dm³)",
        min: 0.00,
        max: 1.00,
        default: 0.30,
        step: 0.01,
        decimals: 2,
    },
    FieldSpec {
        column: "residual sugar",
        label: "Residual Sugar (g/dm³)",
        min: 0.5,
        max: 15.0,
        default: 2.5,
        step: 0.1,
        decimals: 1,
    },
    FieldSpec {
        column: "chlorides",
        label: "Chlorides (g(sodium chloride)/dm³)",
        min: 0.010,
        max: 0.500,
        default: 0.080,
        step: 0.001,
        decimals: 3,
    },
    FieldSpec {
        column: "free sulfur dioxide",
        label: "Free Sulfur Dioxide (mg/dm³)",
        min: 1.0,
        max: 80.0,
        default: 15.0,
        step: 1.0,
        decimals: 0,
    },
    FieldSpec {
        column: "total sulfur dioxide",
        label: "Total Sulfur Dioxide (mg/dm³)",
        min: 6.0,
        max: 300.0,
        default: 46.0,
        step: 1.0,
        decimals: 0,
    },
    FieldSpec {
        column: "density",
        label: "Density (g/cm³)",
        min: 0.9900,
        max: 1.0050,
        default: 0.9968,
        step: 0.0001,
        decimals: 4,
    },
    FieldSpec {
        column: "ph",
        label: "pH",
        min: 2.50,
        max: 4.50,
        default: 3.30,
        step: 0.01,
        decimals: 2,
    },
    FieldSpec {
        column: "sulphates",
        label: "Sulphates (g(potassium sulphate)/dm³)",
        min: 0.30,
        max: 2.00,
        default: 0.60,
        step: 0.01,
        decimals: 2,
    },
    FieldSpec {
        column: "alcohol",
        label: "Alcohol (% vol)",
        min: 8.0,
        max: 15.0,
        default: 10.0,
        step: 0.1,
        decimals: 1,
    },
];

/// One wine's measurements in training column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WineSample {
    pub values: [f64; FEATURE_COUNT],
}

impl WineSample {
    /// Sample populated with every field's default.
    pub fn defaults() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (value, spec) in values.iter_mut().zip(FIELD_SPECS.iter()) {
            *value = spec.default;
        }
        Self { values }
    }

    /// Build a sample, clamping each value to its field bounds.
    pub fn clamped(values: [f64; FEATURE_COUNT]) -> Self {
        let mut out = values;
        for (value, spec) in out.iter_mut().zip(FIELD_SPECS.iter()) {
            *value = spec.clamp(*value);
        }
        Self { values: out }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

impl Default for WineSample {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Qualitative bucket for a predicted quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    High,
    Average,
    Low,
}

impl QualityTier {
    /// Bucket a score: `>= 7` high, `>= 5` average, anything lower is low.
    pub fn classify(score: f64) -> Self {
        if score >= 7.0 {
            QualityTier::High
        } else if score >= 5.0 {
            QualityTier::Average
        } else {
            QualityTier::Low
        }
    }

    /// Message shown next to the predicted score.
    pub fn message(self) -> &'static str {
        match self {
            QualityTier::High => "This looks like a high-quality wine!",
            QualityTier::Average => "This seems like an average-quality wine.",
            QualityTier::Low => "This seems like a low-quality wine.",
        }
    }
}

/// Round a score to two decimals, halves away from zero.
pub fn round_quality(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_specs_follow_feature_columns() {
        for (spec, column) in FIELD_SPECS.iter().zip(FEATURE_COLUMNS.iter()) {
            assert_eq!(spec.column, *column);
            assert!(spec.min <= spec.default && spec.default <= spec.max);
            assert!(spec.step > 0.0);
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(QualityTier::classify(7.0), QualityTier::High);
        assert_eq!(QualityTier::classify(6.99), QualityTier::Average);
        assert_eq!(QualityTier::classify(5.0), QualityTier::Average);
        assert_eq!(QualityTier::classify(4.99), QualityTier::Low);
    }

    #[test]
    fn rounding_feeds_tier() {
        let rounded = round_quality(6.996);
        assert_eq!(rounded, 7.0);
        assert_eq!(QualityTier::classify(rounded), QualityTier::High);
        assert_eq!(round_quality(5.234), 5.23);
    }

    #[test]
    fn clamped_sample_respects_bounds() {
        let mut values = WineSample::defaults().values;
        values[0] = 100.0;
        values[7] = 0.5;
        values[10] = f64::NAN;
        let sample = WineSample::clamped(values);
        assert_eq!(sample.values[0], 16.0);
        assert_eq!(sample.values[7], 0.99);
        assert_eq!(sample.values[10], 10.0);
    }
}
