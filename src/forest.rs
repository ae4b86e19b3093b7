// 🌲 Random Forest - bagged CART regression trees (squared-error criterion)
// Every tree is built from a seeded StdRng: same config, seed and data give the same forest.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::ForestConfig;
use crate::error::AnalysisError;

/// Values closer than this are treated as equal when placing thresholds
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Node impurity at or below this is a pure leaf
const IMPURITY_EPSILON: f64 = f64::EPSILON;

// ============================================================================
// TREE
// ============================================================================

/// Flattened tree node; `value` is set only on leaves
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub feature_index: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
    pub value: Option<f64>,
}

impl TreeNode {
    fn leaf(value: f64) -> Self {
        TreeNode {
            feature_index: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value: Some(value),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
    /// Weighted impurity decrease accumulated per feature
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0usize;

        loop {
            let node = &self.nodes[idx];
            if let Some(value) = node.value {
                return value;
            }
            idx = if row[node.feature_index] <= node.threshold {
                node.left
            } else {
                node.right
            };
        }
    }

    pub fn is_leaf_only(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            let node = &nodes[idx];
            if node.value.is_some() {
                0
            } else {
                1 + walk(nodes, node.left).max(walk(nodes, node.right))
            }
        }
        walk(&self.nodes, 0)
    }

    /// Impurity decrease per feature, normalised to sum to 1 (all zeros for a single leaf)
    pub fn feature_importances(&self) -> Vec<f64> {
        normalise(self.impurity_decrease.clone())
    }
}

fn normalise(mut values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        for v in &mut values {
            *v /= total;
        }
    }
    values
}

// ============================================================================
// TREE BUILDER
// ============================================================================

/// Weighted sums over a node's samples
#[derive(Clone, Copy, Debug, Default)]
struct NodeStats {
    weight: f64,
    mean: f64,
    impurity: f64,
}

/// Best split found for a node
#[derive(Clone, Copy, Debug)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    proxy_gain: f64,
}

struct TreeBuilder<'a> {
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    weights: &'a [f64],
    config: &'a ForestConfig,
    feature_count: usize,
    rng: StdRng,
    nodes: Vec<TreeNode>,
    impurity_decrease: Vec<f64>,
}

impl<'a> TreeBuilder<'a> {
    fn build(mut self) -> RegressionTree {
        let indices: Vec<usize> = (0..self.targets.len())
            .filter(|&i| self.weights[i] > 0.0)
            .collect();

        self.build_node(indices, 0);

        RegressionTree {
            nodes: self.nodes,
            impurity_decrease: self.impurity_decrease,
        }
    }

    fn build_node(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let current_idx = self.nodes.len();
        let stats = self.node_stats(&indices);

        let too_deep = self.config.max_depth.map_or(false, |max| depth >= max);
        if too_deep
            || indices.len() < self.config.min_samples_split
            || indices.len() < 2 * self.config.min_samples_leaf
            || stats.impurity <= IMPURITY_EPSILON
        {
            self.nodes.push(TreeNode::leaf(stats.mean));
            return current_idx;
        }

        let split = match self.find_best_split(&indices) {
            Some(s) => s,
            None => {
                self.nodes.push(TreeNode::leaf(stats.mean));
                return current_idx;
            }
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.features[i][split.feature_idx] <= split.threshold);

        let left_stats = self.node_stats(&left_indices);
        let right_stats = self.node_stats(&right_indices);
        self.impurity_decrease[split.feature_idx] += stats.weight * stats.impurity
            - left_stats.weight * left_stats.impurity
            - right_stats.weight * right_stats.impurity;

        // Reserve the slot, children are patched in after recursion
        self.nodes.push(TreeNode {
            feature_index: split.feature_idx,
            threshold: split.threshold,
            left: 0,
            right: 0,
            value: None,
        });

        let left_idx = self.build_node(left_indices, depth + 1);
        let right_idx = self.build_node(right_indices, depth + 1);

        self.nodes[current_idx].left = left_idx;
        self.nodes[current_idx].right = right_idx;

        current_idx
    }

    /// Exact greedy search over every feature, visited in a random order
    fn find_best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
        let mut order: Vec<usize> = (0..self.feature_count).collect();
        order.shuffle(&mut self.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut column: Vec<(f64, f64, f64)> = Vec::with_capacity(indices.len());

        for feature_idx in order {
            column.clear();
            column.extend(
                indices
                    .iter()
                    .map(|&i| (self.features[i][feature_idx], self.targets[i], self.weights[i])),
            );
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let n = column.len();
            if column[n - 1].0 <= column[0].0 + FEATURE_THRESHOLD {
                continue;
            }

            let total_weight: f64 = column.iter().map(|c| c.2).sum();
            let total_sum: f64 = column.iter().map(|c| c.1 * c.2).sum();

            let mut left_weight = 0.0;
            let mut left_sum = 0.0;

            for pos in 0..n - 1 {
                let (x, y, w) = column[pos];
                left_weight += w;
                left_sum += y * w;

                let next_x = column[pos + 1].0;
                if next_x <= x + FEATURE_THRESHOLD {
                    continue;
                }

                let n_left = pos + 1;
                if n_left < self.config.min_samples_leaf || n - n_left < self.config.min_samples_leaf {
                    continue;
                }

                let right_weight = total_weight - left_weight;
                let right_sum = total_sum - left_sum;

                // Maximising this is equivalent to minimising the children's weighted impurity
                let proxy_gain =
                    left_sum * left_sum / left_weight + right_sum * right_sum / right_weight;

                if best.map_or(true, |b| proxy_gain > b.proxy_gain) {
                    let mut threshold = x / 2.0 + next_x / 2.0;
                    if threshold == next_x || !threshold.is_finite() {
                        threshold = x;
                    }
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        proxy_gain,
                    });
                }
            }
        }

        best
    }

    fn node_stats(&self, indices: &[usize]) -> NodeStats {
        let weight: f64 = indices.iter().map(|&i| self.weights[i]).sum();
        if weight <= 0.0 {
            return NodeStats::default();
        }

        let mean = indices
            .iter()
            .map(|&i| self.weights[i] * self.targets[i])
            .sum::<f64>()
            / weight;

        let impurity = indices
            .iter()
            .map(|&i| {
                let d = self.targets[i] - mean;
                self.weights[i] * d * d
            })
            .sum::<f64>()
            / weight;

        NodeStats {
            weight,
            mean,
            impurity,
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

pub struct RandomForestRegressor {
    config: ForestConfig,
    seed: u64,
    trees: Vec<RegressionTree>,
    feature_count: usize,
}

impl RandomForestRegressor {
    pub fn new(config: ForestConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            trees: Vec::new(),
            feature_count: 0,
        }
    }

    /// Fit the ensemble; replaces any previously fitted trees.
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<(), AnalysisError> {
        if features.is_empty() {
            return Err(AnalysisError::Training("no training rows".to_string()));
        }
        if features.len() != targets.len() {
            return Err(AnalysisError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if self.config.n_estimators == 0 {
            return Err(AnalysisError::Training("n_estimators must be at least 1".to_string()));
        }

        let feature_count = features[0].len();
        if feature_count == 0 {
            return Err(AnalysisError::Training("rows have no features".to_string()));
        }
        for (i, row) in features.iter().enumerate() {
            if row.len() != feature_count {
                return Err(AnalysisError::Training(format!(
                    "row {} has {} features, expected {}",
                    i,
                    row.len(),
                    feature_count
                )));
            }
            if row.iter().any(|v| !v.is_finite()) || !targets[i].is_finite() {
                return Err(AnalysisError::Training(format!("row {} contains a non-finite value", i)));
            }
        }

        info!(
            "Fitting random forest: {} trees on {} rows x {} features (seed {})",
            self.config.n_estimators,
            features.len(),
            feature_count,
            self.seed
        );

        let n = features.len();
        let mut master = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for tree_idx in 0..self.config.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.random::<u64>());

            let weights = if self.config.bootstrap {
                let mut counts = vec![0.0; n];
                for _ in 0..n {
                    counts[rng.random_range(0..n)] += 1.0;
                }
                counts
            } else {
                vec![1.0; n]
            };

            let builder = TreeBuilder {
                features,
                targets,
                weights: &weights,
                config: &self.config,
                feature_count,
                rng,
                nodes: Vec::new(),
                impurity_decrease: vec![0.0; feature_count],
            };
            let tree = builder.build();

            debug!(
                "Tree {}/{}: {} nodes, depth {}",
                tree_idx + 1,
                self.config.n_estimators,
                tree.nodes.len(),
                tree.depth()
            );
            trees.push(tree);
        }

        self.trees = trees;
        self.feature_count = feature_count;
        Ok(())
    }

    /// Mean of the tree predictions for one row
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        total / self.trees.len() as f64
    }

    pub fn predict(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Mean decrease in impurity per feature, summing to 1.
    ///
    /// Trees that never split are left out of the average; if no tree split
    /// at all every importance is zero.
    pub fn feature_importances(&self) -> Vec<f64> {
        let split_trees: Vec<&RegressionTree> =
            self.trees.iter().filter(|t| !t.is_leaf_only()).collect();

        if split_trees.is_empty() {
            return vec![0.0; self.feature_count];
        }

        let mut mean = vec![0.0; self.feature_count];
        for tree in &split_trees {
            for (acc, imp) in mean.iter_mut().zip(tree.feature_importances()) {
                *acc += imp;
            }
        }
        for v in &mut mean {
            *v /= split_trees.len() as f64;
        }

        normalise(mean)
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

// ============================================================================
// TESTS
// ============================================================================
