//! TOML configuration shared by the trainer and the predictor.
//!
//! `config.toml` lives in the `.vintner` app directory. Every key is optional; missing keys fall
//! back to the defaults in `defaults.rs` and out-of-range values are clamped after parsing.
//! Command-line flags override whatever is loaded here.

mod defaults;
mod io;
mod types;

pub use defaults::{MAX_TEST_FRACTION, MIN_TEST_FRACTION};
pub use io::{
    CONFIG_FILE_NAME, config_path, load_explicit_or_default, load_from, load_or_default,
    save_to_path,
};
pub use types::{AppConfig, ArtifactSettings, ConfigError, TrainingSettings};
