//! Hold-out evaluation helpers

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Shuffled train/test partition of example indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Indices used for fitting
    pub train: Vec<usize>,
    /// Indices held out for scoring
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n × test_fraction)` indices.
///
/// `test_fraction` is expected in [0, 1).
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n);
    let train = indices.split_off(n_test);
    Split {
        train,
        test: indices,
    }
}

/// Coefficient of determination of `predicted` against `actual`.
///
/// Returns `None` for empty input or a constant `actual` series, where R² is
/// undefined.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot <= 0.0 {
        return None;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    Some(1.0 - ss_res / ss_tot)
}
