use serde::{Deserialize, Serialize};

use super::train::ForestOptions;

/// Format version written into model artifacts.
pub const FOREST_VERSION: i64 = 1;

/// One node of a flattened regression tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Terminal node predicting the mean target of its samples.
    Leaf { value: f64 },
    /// Internal node; `feature <= threshold` descends into `left`.
    Split {
        feature: u16,
        threshold: f64,
        left: u32,
        right: u32,
    },
}

/// Regression tree stored as a flat node array with the root at index 0.
///
/// Children always sit at higher indices than their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Walk the tree for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature as usize).copied().unwrap_or(0.0);
                    let next = if value <= threshold { left } else { right };
                    idx = next as usize;
                }
            }
        }
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0usize;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let child_depth = depths[idx] + 1;
                depths[*left as usize] = child_depth;
                depths[*right as usize] = child_depth;
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("Leaf {idx} has a non-finite value"));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature as usize >= n_features {
                        return Err(format!(
                            "Node {idx} splits on feature {feature} but model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("Node {idx} has a non-finite threshold"));
                    }
                    for child in [left as usize, right as usize] {
                        if child <= idx || child >= len {
                            return Err(format!("Node {idx} has invalid child index {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Random-forest regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f64` values per feature vector.
    pub n_features: usize,
    /// Feature labels in training order.
    pub feature_names: Vec<String>,
    /// Hyperparameters the forest was grown with.
    pub options: ForestOptions,
    pub trees: Vec<RegressionTree>,
    /// Normalized impurity decrease per feature, aligned with `feature_names`.
    pub feature_importances: Vec<f64>,
}

impl RandomForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.model_version != FOREST_VERSION {
            return Err(format!(
                "Unsupported model version {} (expected {FOREST_VERSION})",
                self.model_version
            ));
        }
        if self.n_features == 0 {
            return Err("Model has no features".to_string());
        }
        if self.feature_names.len() != self.n_features {
            return Err("feature_names length must match n_features".to_string());
        }
        if self.feature_importances.len() != self.n_features {
            return Err("feature_importances length must match n_features".to_string());
        }
        if self.trees.is_empty() {
            return Err("Model has no trees".to_string());
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|err| format!("Tree {tree_idx}: {err}"))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Average the tree outputs for one feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        total / self.trees.len().max(1) as f64
    }

    /// Predict every row of a feature matrix.
    pub fn predict_many(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
