//! Risk regressor: training, prediction and persistence
//!
//! The [`Regressor`] trait is the seam between the engine and a fitted backend.
//! Two backends exist:
//! - [`RandomForest`] (default) - bagged CART trees, fit in parallel
//! - [`LinearRegressor`] - ordinary least squares
//!
//! [`TrainedModel`] wraps whichever backend was fit and is what gets persisted.

pub mod forest;
pub mod linear;
pub mod metrics;
pub mod persistence;
pub mod tree;

pub use forest::{ForestParams, RandomForest};
pub use linear::LinearRegressor;
pub use metrics::{r2_score, train_test_split, Split};
pub use persistence::{load, save};
pub use tree::RegressionTree;

use crate::core_types::{FeatureVector, FEATURE_COUNT};
use crate::error::TrainingError;
use crate::scoring::TrainingCorpus;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A fitted regression function over raw feature rows in canonical order
pub trait Regressor {
    /// Raw, unclamped model output for one row
    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64;

    /// Raw, unclamped model output for a feature vector
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.predict_row(&features.as_array())
    }
}

/// Which backend to fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Random forest with the given hyperparameters
    Forest(ForestParams),
    /// Ordinary least squares
    Linear,
}

impl ModelKind {
    /// Short backend name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            ModelKind::Forest(_) => "random forest",
            ModelKind::Linear => "linear",
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::Forest(ForestParams::default())
    }
}

/// A fitted model of either backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainedModel {
    /// Random forest
    Forest(RandomForest),
    /// Least squares
    Linear(LinearRegressor),
}

impl TrainedModel {
    /// Short backend name for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            TrainedModel::Forest(_) => "random forest",
            TrainedModel::Linear(_) => "linear",
        }
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        match self {
            TrainedModel::Forest(forest) => forest.is_well_formed(),
            TrainedModel::Linear(linear) => linear.is_well_formed(),
        }
    }
}

impl Regressor for TrainedModel {
    fn predict_row(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            TrainedModel::Forest(forest) => forest.predict_row(row),
            TrainedModel::Linear(linear) => linear.predict_row(row),
        }
    }
}

/// Training options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    /// Backend and its hyperparameters
    pub kind: ModelKind,
    /// Fraction of examples held out for scoring, in [0, 1)
    pub test_fraction: f64,
    /// Seed for the split and for backend randomness
    pub seed: u64,
}

/// Outcome of a training run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Examples used for fitting
    pub n_train: usize,
    /// Examples held out
    pub n_test: usize,
    /// Held-out R², `None` if the held-out set is empty or constant
    pub r2: Option<f64>,
}

/// Fit a model on `corpus` and score it on a seeded hold-out split.
///
/// # Errors
/// - [`TrainingError::EmptyCorpus`] for zero examples
/// - [`TrainingError::LengthMismatch`] if features and labels differ in length
/// - [`TrainingError::NonFiniteExample`] if any value is NaN or infinite
/// - [`TrainingError::InvalidTestFraction`] if `test_fraction` is outside [0, 1)
/// - any backend error, e.g. too few rows after the split
pub fn train(
    corpus: &TrainingCorpus,
    options: &TrainOptions,
) -> Result<(TrainedModel, TrainingReport), TrainingError> {
    if corpus.is_empty() {
        return Err(TrainingError::EmptyCorpus);
    }
    if corpus.features.len() != corpus.labels.len() {
        return Err(TrainingError::LengthMismatch {
            features: corpus.features.len(),
            labels: corpus.labels.len(),
        });
    }
    if !(0.0..1.0).contains(&options.test_fraction) {
        return Err(TrainingError::InvalidTestFraction(options.test_fraction));
    }

    let rows: Vec<[f64; FEATURE_COUNT]> = corpus
        .features
        .iter()
        .map(FeatureVector::as_array)
        .collect();
    if let Some(index) = rows
        .iter()
        .zip(&corpus.labels)
        .position(|(row, y)| !y.is_finite() || row.iter().any(|v| !v.is_finite()))
    {
        return Err(TrainingError::NonFiniteExample { index });
    }

    let split = train_test_split(rows.len(), options.test_fraction, options.seed);
    let train_rows: Vec<_> = split.train.iter().map(|&i| rows[i]).collect();
    let train_labels: Vec<f64> = split.train.iter().map(|&i| corpus.labels[i]).collect();

    info!(
        "Training new {} model on {} examples ({} held out)",
        options.kind.name(),
        split.train.len(),
        split.test.len()
    );

    let model = match options.kind {
        ModelKind::Forest(params) => TrainedModel::Forest(RandomForest::fit(
            &train_rows,
            &train_labels,
            &params,
            options.seed,
        )?),
        ModelKind::Linear => {
            TrainedModel::Linear(LinearRegressor::fit(&train_rows, &train_labels)?)
        }
    };

    let actual: Vec<f64> = split.test.iter().map(|&i| corpus.labels[i]).collect();
    let predicted: Vec<f64> = split
        .test
        .iter()
        .map(|&i| model.predict_row(&rows[i]))
        .collect();
    let report = TrainingReport {
        n_train: split.train.len(),
        n_test: split.test.len(),
        r2: r2_score(&actual, &predicted),
    };

    match report.r2 {
        Some(r2) => info!("Model trained. R^2 score: {r2:.4}"),
        None => info!("Model trained. No held-out score available"),
    }

    Ok((model, report))
}
