use crate::wine::{FEATURE_COUNT, FIELD_SPECS, FieldSpec, WineSample};

/// Current values of the eleven input fields, always within their bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: [f64; FEATURE_COUNT],
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: WineSample::defaults().values,
        }
    }
}

impl FormState {
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Store a clamped value; returns whether the stored value changed.
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        let clamped = FIELD_SPECS[index].clamp(value);
        let changed = self.values[index] != clamped;
        self.values[index] = clamped;
        changed
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Assemble the form into a sample in training column order.
    pub fn sample(&self) -> WineSample {
        WineSample::clamped(self.values)
    }

    /// Fields paired with their current values, in training order.
    pub fn fields(&self) -> impl Iterator<Item = (usize, &'static FieldSpec, f64)> + '_ {
        FIELD_SPECS
            .iter()
            .enumerate()
            .map(|(index, spec)| (index, spec, self.values[index]))
    }
}
