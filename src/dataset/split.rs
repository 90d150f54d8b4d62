use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::loader::{DatasetLoadError, LabeledData};

/// Shuffle rows with a seeded RNG and hold out `test_fraction` of them.
///
/// The held-out count is `ceil(n * test_fraction)`; the first shuffled indices form the test
/// split and the remainder the training split. Returns `(train, test)`.
pub fn train_test_split(
    data: &LabeledData,
    test_fraction: f64,
    seed: u64,
) -> Result<(LabeledData, LabeledData), DatasetLoadError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DatasetLoadError::InvalidSplit(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n = data.len();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(DatasetLoadError::InvalidSplit(format!(
            "{n} rows cannot be split with test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((data.subset(train_idx), data.subset(test_idx)))
}
