//! Error types for the risk engine
//!
//! One enum per failure domain:
//! - [`LoadError`] is recovered locally by retraining and never reaches callers of
//!   [`RiskEngine::initialize`](crate::RiskEngine::initialize)
//! - [`TrainingError`] is fatal at startup, there is no usable model
//! - [`PredictError`] is a request-level failure for the boundary layer
//! - [`PersistError`] reports a failed artifact write

use crate::core_types::Feature;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read a persisted model artifact
#[derive(Debug, Error)]
pub enum LoadError {
    /// No artifact exists at the configured path
    #[error("model artifact not found at {}", path.display())]
    Missing {
        /// Path that was probed
        path: PathBuf,
    },

    /// The artifact exists but could not be read
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The artifact was read but is not a usable model
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    Corrupt {
        /// Artifact path
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
}

/// Failure to write a model artifact
#[derive(Debug, Error)]
pub enum PersistError {
    /// The model could not be encoded
    #[error("failed to serialize model: {0}")]
    Serialize(#[from] bincode::Error),

    /// The artifact could not be written or moved into place
    #[error("failed to write model artifact {}: {source}", path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Failure to fit a model. No usable model exists afterwards.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    /// Zero training examples
    #[error("training corpus is empty")]
    EmptyCorpus,

    /// Feature and label sequences differ in length
    #[error("corpus has {features} feature vectors but {labels} labels")]
    LengthMismatch {
        /// Number of feature vectors
        features: usize,
        /// Number of labels
        labels: usize,
    },

    /// The split left nothing (or too little) to fit on
    #[error("need at least {required} training examples, got {actual}")]
    InsufficientTrainingData {
        /// Minimum the backend needs
        required: usize,
        /// What the split provided
        actual: usize,
    },

    /// A feature value or label is NaN or infinite
    #[error("non-finite value in training example {index}")]
    NonFiniteExample {
        /// Position of the offending example
        index: usize,
    },

    /// The least squares solver failed or produced unusable parameters
    #[error("least squares solver failed: {0}")]
    Solver(String),

    /// Label noise parameter is negative or non-finite
    #[error("invalid label noise standard deviation {0}")]
    InvalidNoise(f64),

    /// Held-out fraction outside [0, 1)
    #[error("test fraction must be in [0, 1), got {0}")]
    InvalidTestFraction(f64),

    /// Forest configured with zero trees
    #[error("forest needs at least one tree")]
    NoTrees,
}

/// Failure to replace the running model. The previous model stays in use.
#[derive(Debug, Error)]
pub enum RetrainError {
    /// The replacement could not be trained
    #[error(transparent)]
    Training(#[from] TrainingError),

    /// The replacement could not be persisted
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Request-level prediction failure
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PredictError {
    /// A feature value is NaN or infinite
    #[error("invalid input: {feature} is {value}")]
    InvalidInput {
        /// Offending feature
        feature: Feature,
        /// The value supplied
        value: f64,
    },

    /// The regressor produced NaN or infinity
    #[error("model produced non-finite output {0}")]
    NonFiniteOutput(f64),
}
