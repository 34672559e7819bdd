//! CART regression tree
//!
//! Greedy variance-reduction splits with midpoint thresholds. Nodes live in a
//! flat arena; children are referenced by index.

use crate::core_types::FEATURE_COUNT;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tree growth limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TreeParams {
    /// Maximum depth, `None` grows until leaves are pure or minimal
    pub max_depth: Option<usize>,
    /// Minimum examples in each child of a split
    pub min_samples_leaf: usize,
    /// Features examined per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    sse: f64,
}

struct Builder<'a, R: Rng> {
    rows: &'a [[f64; FEATURE_COUNT]],
    targets: &'a [f64],
    params: TreeParams,
    rng: &'a mut R,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit a tree on the examples selected by `sample` (indices may repeat).
    ///
    /// `sample` must be non-empty.
    pub(crate) fn fit<R: Rng>(
        rows: &[[f64; FEATURE_COUNT]],
        targets: &[f64],
        mut sample: Vec<usize>,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = Builder {
            rows,
            targets,
            params,
            rng,
            nodes: Vec::new(),
        };
        builder.grow(&mut sample, 0);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Predict a single row
    pub fn predict(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return f64::NAN,
            }
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Structural check for trees read back from disk: every child index must
    /// point forward inside the arena and every split must name a real feature.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Leaf { value } => value.is_finite(),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    *feature < FEATURE_COUNT
                        && threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

impl<R: Rng> Builder<'_, R> {
    /// Grow the subtree for `sample`, returning its root index
    fn grow(&mut self, sample: &mut [usize], depth: usize) -> usize {
        let node_idx = self.nodes.len();
        let mean = sample.iter().map(|&i| self.targets[i]).sum::<f64>() / sample.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        let depth_exhausted = self.params.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted || sample.len() < 2 * self.params.min_samples_leaf.max(1) {
            return node_idx;
        }

        let Some(best) = self.best_split(sample) else {
            return node_idx;
        };

        // Partition in place: left half holds rows at or below the threshold
        let mut boundary = 0;
        for k in 0..sample.len() {
            if self.rows[sample[k]][best.feature] <= best.threshold {
                sample.swap(boundary, k);
                boundary += 1;
            }
        }
        let (left_sample, right_sample) = sample.split_at_mut(boundary);

        let left = self.grow(left_sample, depth + 1);
        let right = self.grow(right_sample, depth + 1);
        self.nodes[node_idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split(&mut self, sample: &[usize]) -> Option<BestSplit> {
        let rows = self.rows;
        let targets = self.targets;
        let first = targets[sample[0]];
        if sample.iter().all(|&i| targets[i] == first) {
            return None; // pure node
        }

        let n = sample.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let total: f64 = sample.iter().map(|&i| targets[i]).sum();
        let total_sq: f64 = sample.iter().map(|&i| targets[i] * targets[i]).sum();
        let parent_sse = total_sq - total * total / n as f64;

        let candidates = index::sample(
            &mut *self.rng,
            FEATURE_COUNT,
            self.params.max_features.clamp(1, FEATURE_COUNT),
        );

        let mut best: Option<BestSplit> = None;
        let mut order = sample.to_vec();
        for feature in candidates {
            order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let y = targets[order[k - 1]];
                left_sum += y;
                left_sq += y * y;

                let lo = rows[order[k - 1]][feature];
                let hi = rows[order[k]][feature];
                if k < min_leaf || n - k < min_leaf || hi <= lo {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / k as f64)
                    + (right_sq - right_sum * right_sum / (n - k) as f64);

                if best.as_ref().is_none_or(|b| sse < b.sse) {
                    let mut threshold = lo + (hi - lo) / 2.0;
                    // Guard against the midpoint rounding up onto `hi`
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        sse,
                    });
                }
            }
        }

        best.filter(|b| b.sse < parent_sse)
    }
}
