//! Deterministic random-forest regressor.
//!
//! An ensemble of CART regression trees, each grown on a bootstrap sample of the training rows
//! with exact split search. Supports:
//! - Reproducible training from a single seed.
//! - Impurity-based feature importances.
//! - JSON export/load through serde (see [`crate::inference`]).

mod model;
mod train;

pub use model::{FOREST_VERSION, RandomForestModel, RegressionTree, TreeNode};
pub use train::{ForestOptions, train_random_forest};
