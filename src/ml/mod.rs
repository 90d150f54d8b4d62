//! Machine learning building blocks for training and inference.
//!
//! Everything here is plain Rust over `Vec<f64>` rows: a standardization transform, a random
//! forest regressor and the metrics used to evaluate it.

pub mod forest;
pub mod metrics;
pub mod scaler;
