use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::model::{FOREST_VERSION, RandomForestModel, RegressionTree, TreeNode};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestOptions {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Seed for bootstrap sampling and feature subsampling.
    pub seed: u64,
    /// Maximum tree depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` considers all of them.
    pub max_features: Option<usize>,
    /// Grow each tree on a bootstrap sample instead of the full training set.
    pub bootstrap: bool,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 250,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
        }
    }
}

/// Grow a random forest on `x`/`y`.
pub fn train_random_forest(
    x: &[Vec<f64>],
    y: &[f64],
    feature_names: &[String],
    options: &ForestOptions,
) -> Result<RandomForestModel, String> {
    if x.len() != y.len() {
        return Err("Mismatched X/Y lengths".to_string());
    }
    if x.is_empty() {
        return Err("Empty dataset".to_string());
    }
    if options.n_trees == 0 {
        return Err("Need at least 1 tree".to_string());
    }
    let d = feature_names.len();
    if d == 0 || d > u16::MAX as usize {
        return Err(format!("Unsupported feature count {d}"));
    }
    if x.iter().any(|row| row.len() != d) {
        return Err(format!("Every row must have {d} features"));
    }
    if x.iter().flatten().chain(y).any(|v| !v.is_finite()) {
        return Err("Training data contains non-finite values".to_string());
    }
    if let Some(k) = options.max_features
        && (k == 0 || k > d)
    {
        return Err(format!("max_features must be in 1..={d}, got {k}"));
    }

    let n = x.len();
    let mut master = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.n_trees);
    let mut importances = vec![0.0f64; d];

    for _ in 0..options.n_trees {
        let mut rng = StdRng::seed_from_u64(master.random::<u64>());
        let samples: Vec<usize> = if options.bootstrap {
            (0..n).map(|_| rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };
        let mut grower = TreeGrower {
            x,
            y,
            options,
            rng,
            feature_pool: (0..d).collect(),
            nodes: Vec::new(),
            importances: vec![0.0; d],
        };
        grower.grow(samples, 0);

        let tree_total: f64 = grower.importances.iter().sum();
        if tree_total > 0.0 {
            for (acc, value) in importances.iter_mut().zip(&grower.importances) {
                *acc += value / tree_total;
            }
        }
        trees.push(RegressionTree {
            nodes: grower.nodes,
        });
    }

    let total: f64 = importances.iter().sum();
    if total > 0.0 {
        for value in &mut importances {
            *value /= total;
        }
    }

    Ok(RandomForestModel {
        model_version: FOREST_VERSION,
        n_features: d,
        feature_names: feature_names.to_vec(),
        options: options.clone(),
        trees,
        feature_importances: importances,
    })
}

struct TreeGrower<'a> {
    x: &'a [Vec<f64>],
    y: &'a [f64],
    options: &'a ForestOptions,
    rng: StdRng,
    feature_pool: Vec<usize>,
    nodes: Vec<TreeNode>,
    importances: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// `sum_l² / n_l + sum_r² / n_r`; larger means lower child SSE.
    proxy: f64,
}

impl TreeGrower<'_> {
    /// Grow the subtree for `samples` and return its root index.
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> u32 {
        let node_id = self.nodes.len();
        let sum: f64 = samples.iter().map(|&i| self.y[i]).sum();
        let count = samples.len() as f64;
        self.nodes.push(TreeNode::Leaf { value: sum / count });

        if !self.may_split(&samples, depth) {
            return node_id as u32;
        }
        let Some(split) = self.best_split(&samples, sum) else {
            return node_id as u32;
        };

        let parent_proxy = sum * sum / count;
        self.importances[split.feature] += (split.proxy - parent_proxy).max(0.0);

        let x = self.x;
        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&i| x[i][split.feature] <= split.threshold);
        let left_id = self.grow(left, depth + 1);
        let right_id = self.grow(right, depth + 1);
        self.nodes[node_id] = TreeNode::Split {
            feature: split.feature as u16,
            threshold: split.threshold,
            left: left_id,
            right: right_id,
        };
        node_id as u32
    }

    fn may_split(&self, samples: &[usize], depth: usize) -> bool {
        let n = samples.len();
        if n < self.options.min_samples_split.max(2) {
            return false;
        }
        if n < 2 * self.options.min_samples_leaf.max(1) {
            return false;
        }
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return false;
        }
        let first = self.y[samples[0]];
        samples.iter().any(|&i| self.y[i] != first)
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        match self.options.max_features {
            Some(k) if k < self.feature_pool.len() => {
                self.feature_pool.shuffle(&mut self.rng);
                let mut picked = self.feature_pool[..k].to_vec();
                picked.sort_unstable();
                picked
            }
            _ => self.feature_pool.clone(),
        }
    }

    /// Exact search for the split that minimizes the children's summed squared error.
    fn best_split(&mut self, samples: &[usize], total_sum: f64) -> Option<SplitCandidate> {
        let features = self.candidate_features();
        let x = self.x;
        let y = self.y;
        let n = samples.len();
        let min_leaf = self.options.min_samples_leaf.max(1);

        let mut order = samples.to_vec();
        let mut best: Option<SplitCandidate> = None;
        for feature in features {
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
            let mut left_sum = 0.0f64;
            for pos in 0..n - 1 {
                let idx = order[pos];
                left_sum += y[idx];
                let left_count = pos + 1;
                let right_count = n - left_count;
                if right_count < min_leaf {
                    break;
                }
                if left_count < min_leaf {
                    continue;
                }
                let current = x[idx][feature];
                let next = x[order[pos + 1]][feature];
                if next <= current {
                    continue;
                }
                let right_sum = total_sum - left_sum;
                let proxy = left_sum * left_sum / left_count as f64
                    + right_sum * right_sum / right_count as f64;
                if best.is_none_or(|b| proxy > b.proxy) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(current, next),
                        proxy,
                    });
                }
            }
        }
        best
    }
}

/// Threshold between two distinct sorted values; `current <= t < next`.
fn midpoint(current: f64, next: f64) -> f64 {
    let mid = current / 2.0 + next / 2.0;
    if mid >= next || !mid.is_finite() {
        current
    } else {
        mid
    }
}
