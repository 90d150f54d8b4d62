use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use vintner::wine::FIELD_SPECS;

/// Header as it appears in the UCI red wine file, quotes included.
pub const UCI_HEADER: &str = concat!(
    "\"fixed acidity\";\"volatile acidity\";\"citric acid\";\"residual sugar\";",
    "\"chlorides\";\"free sulfur dioxide\";\"total sulfur dioxide\";\"density\";",
    "\"pH\";\"sulphates\";\"alcohol\";\"quality\"",
);

/// Semicolon-separated wine table whose quality rises with alcohol and falls with volatile acidity.
pub fn synthetic_wine_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut text = String::from(UCI_HEADER);
    text.push('\n');
    for _ in 0..rows {
        let values: Vec<f64> = FIELD_SPECS
            .iter()
            .map(|spec| {
                let span = (spec.max - spec.min) * 0.5;
                let low = spec.min + span * 0.25;
                let value = rng.random_range(low..low + span);
                let factor = 10f64.powi(spec.decimals as i32);
                (value * factor).round() / factor
            })
            .collect();
        let alcohol = values[10];
        let volatile = values[1];
        let noise: f64 = rng.random_range(-0.4..0.4);
        let quality = (3.0 + (alcohol - 8.0) * 0.8 - volatile * 2.0 + noise)
            .round()
            .clamp(3.0, 8.0);
        let cells: Vec<String> = values.iter().map(|value| value.to_string()).collect();
        text.push_str(&cells.join(";"));
        text.push_str(&format!(";{quality}\n"));
    }
    text
}

pub fn write_wine_csv(path: &Path, rows: usize, seed: u64) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create csv parent dirs");
    }
    std::fs::write(path, synthetic_wine_csv(rows, seed)).expect("write wine csv");
}
