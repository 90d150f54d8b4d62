//! Library exports for the trainer, the predictor window, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// TOML configuration for artifacts and training.
pub mod config;
/// Delimited dataset loading and train/test splitting.
pub mod dataset;
/// egui predictor form.
pub mod egui_app;
/// Artifact persistence and quality prediction.
pub mod inference;
/// Tracing subscriber setup.
pub mod logging;
/// Scaler, forest and metric implementations.
pub mod ml;
/// End-to-end training pipeline.
pub mod training;
/// Wine feature schema, field bounds and quality tiers.
pub mod wine;
