//! Random forest regressor
//!
//! Bagged ensemble of CART trees. Every tree sees a bootstrap resample of the
//! training rows and the forest prediction is the mean over trees.
//!
//! Trees are fit in parallel with rayon. Each tree gets its own `ChaCha8` stream
//! seeded from the forest seed before any work is scheduled, so the fitted
//! forest does not depend on thread interleaving.

use super::tree::{RegressionTree, TreeParams};
use super::Regressor;
use crate::core_types::FEATURE_COUNT;
use crate::error::TrainingError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of trees
pub const DEFAULT_TREES: usize = 100;

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum tree depth, `None` for fully grown trees
    pub max_depth: Option<usize>,
    /// Minimum training examples per leaf
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            max_depth: None,
            min_samples_leaf: 1,
        }
    }
}

/// A fitted random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit a forest.
    ///
    /// # Errors
    /// - [`TrainingError::NoTrees`] if `params.n_trees` is zero
    /// - [`TrainingError::InsufficientTrainingData`] if there are no rows
    pub fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
        params: &ForestParams,
        seed: u64,
    ) -> Result<Self, TrainingError> {
        if params.n_trees == 0 {
            return Err(TrainingError::NoTrees);
        }
        let n = rows.len();
        if n == 0 {
            return Err(TrainingError::InsufficientTrainingData {
                required: 1,
                actual: 0,
            });
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_leaf: params.min_samples_leaf.max(1),
            max_features: FEATURE_COUNT,
        };

        let mut seeder = ChaCha8Rng::seed_from_u64(seed);
        let tree_seeds: Vec<u64> = (0..params.n_trees).map(|_| seeder.random()).collect();

        let trees: Vec<RegressionTree> = tree_seeds
            .into_par_iter()
            .map(|tree_seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(tree_seed);
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                RegressionTree::fit(rows, targets, bootstrap, tree_params, &mut rng)
            })
            .collect();

        debug!(
            "Fitted {} trees, {} nodes total",
            trees.len(),
            trees.iter().map(RegressionTree::node_count).sum::<usize>()
        );

        Ok(Self { trees })
    }

    /// Number of trees
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        !self.trees.is_empty() && self.trees.iter().all(RegressionTree::is_well_formed)
    }
}

impl Regressor for RandomForest {
    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        sum / self.trees.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_rows(n: usize) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
        let rows: Vec<_> = (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                [x, 1.0 - x, 0.0, 0.0, 0.0]
            })
            .collect();
        let targets = rows.iter().map(|r| r[0]).collect();
        (rows, targets)
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (rows, targets) = linear_rows(100);
        let params = ForestParams {
            n_trees: 8,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(&rows, &targets, &params, 42).unwrap();
        let b = RandomForest::fit(&rows, &targets, &params, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tree_count(), 8);
        assert!(a.is_well_formed());
    }

    #[test]
    fn test_tracks_monotone_target() {
        let (rows, targets) = linear_rows(200);
        let forest = RandomForest::fit(&rows, &targets, &ForestParams::default(), 7).unwrap();
        let low = forest.predict_row(&[0.1, 0.9, 0.0, 0.0, 0.0]);
        let high = forest.predict_row(&[0.9, 0.1, 0.0, 0.0, 0.0]);
        assert!((low - 0.1).abs() < 0.05, "low = {low}");
        assert!((high - 0.9).abs() < 0.05, "high = {high}");
    }

    #[test]
    fn test_zero_trees_rejected() {
        let (rows, targets) = linear_rows(10);
        let params = ForestParams {
            n_trees: 0,
            ..ForestParams::default()
        };
        assert_eq!(
            RandomForest::fit(&rows, &targets, &params, 1).unwrap_err(),
            TrainingError::NoTrees
        );
    }

    #[test]
    fn test_empty_rows_rejected() {
        let err = RandomForest::fit(&[], &[], &ForestParams::default(), 1).unwrap_err();
        assert!(matches!(
            err,
            TrainingError::InsufficientTrainingData { actual: 0, .. }
        ));
    }
}
