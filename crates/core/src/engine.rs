//! Risk scoring engine
//!
//! [`RiskEngine`] owns the trained model and is built once at startup:
//! load the persisted artifact, or on any load failure train a fresh model
//! from the synthetic corpus and persist it. After that the model is read-only,
//! so `predict` takes `&self` and the engine can be shared across threads
//! (e.g. behind an `Arc`) without locking.
//!
//! # Example
//!
//! ```no_run
//! use fire_risk_core::{EngineConfig, FeatureVector, RiskEngine};
//!
//! let engine = RiskEngine::initialize(EngineConfig::default())?;
//! let result = engine.predict(&FeatureVector::new(38.0, 15.0, 40.0, 0.0, 0.8))?;
//! println!("{} ({:.2})", result.risk_level, result.probability);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::core_types::{FeatureVector, RiskLevel};
use crate::error::{PredictError, RetrainError, TrainingError};
use crate::model::{self, ModelKind, Regressor, TrainOptions, TrainedModel, TrainingReport};
use crate::scoring::{analyze, synthetic, ContributionEntry, SyntheticGenerator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "forest_fire_model.bin";

/// Default held-out fraction
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where the model artifact lives
    pub model_path: PathBuf,
    /// Synthetic corpus size
    pub n_samples: usize,
    /// Seed for corpus generation, the split and backend randomness
    pub seed: u64,
    /// Fraction of the corpus held out for scoring
    pub test_fraction: f64,
    /// Label noise standard deviation
    pub noise_std: f64,
    /// Regression backend
    pub model: ModelKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            n_samples: synthetic::DEFAULT_SAMPLES,
            seed: synthetic::DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            noise_std: synthetic::DEFAULT_NOISE_STD,
            model: ModelKind::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration with a different artifact path
    pub fn with_model_path(path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: path.into(),
            ..Self::default()
        }
    }
}

/// How the engine obtained its model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelSource {
    /// Read from the persisted artifact
    Loaded,
    /// Trained in this process
    Trained(TrainingReport),
}

/// Full answer for one prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Risk probability, always finite and in [0, 1]
    pub probability: f64,
    /// Tier derived from `probability`
    pub risk_level: RiskLevel,
    /// True for High and Critical tiers
    pub alert: bool,
    /// Per-feature breakdown in canonical order
    pub analysis: Vec<ContributionEntry>,
}

/// Classify a probability without an engine
pub fn get_risk_level(probability: f64) -> RiskLevel {
    RiskLevel::from_probability(probability)
}

/// Owning context for the trained model
#[derive(Debug, Clone)]
pub struct RiskEngine {
    model: TrainedModel,
    config: EngineConfig,
    source: ModelSource,
}

impl RiskEngine {
    /// Load the persisted model, or train and persist a new one.
    ///
    /// Load failures (missing file, unreadable or corrupt artifact) are logged
    /// and recovered by retraining. A failure to persist the freshly trained
    /// model is logged and the in-memory model is used anyway.
    ///
    /// # Errors
    /// Returns [`TrainingError`] only when no usable model could be produced.
    /// This is fatal: the caller should not start serving requests.
    pub fn initialize(config: EngineConfig) -> Result<Self, TrainingError> {
        match model::load(&config.model_path) {
            Ok(model) => {
                return Ok(Self {
                    model,
                    config,
                    source: ModelSource::Loaded,
                })
            }
            Err(e) => warn!("Could not load model, training a new one: {e}"),
        }

        let (model, report) = train_model(&config)?;
        if let Err(e) = model::save(&model, &config.model_path) {
            warn!("Trained model could not be persisted, serving from memory: {e}");
        }

        Ok(Self {
            model,
            config,
            source: ModelSource::Trained(report),
        })
    }

    /// Wrap an already trained model without touching the filesystem
    pub fn from_model(model: TrainedModel, config: EngineConfig) -> Self {
        Self {
            model,
            config,
            source: ModelSource::Loaded,
        }
    }

    /// Train a replacement model, persist it, then swap it in.
    ///
    /// The current model keeps serving until the new one is trained and written;
    /// on any error it stays in place.
    ///
    /// # Errors
    /// [`RetrainError`] if training or persisting fails.
    pub fn retrain(&mut self) -> Result<TrainingReport, RetrainError> {
        let (model, report) = train_model(&self.config)?;
        model::save(&model, &self.config.model_path)?;
        self.model = model;
        self.source = ModelSource::Trained(report);
        info!("Swapped in retrained model");
        Ok(report)
    }

    /// Risk probability for `features`, clamped to [0, 1].
    ///
    /// # Errors
    /// - [`PredictError::InvalidInput`] for NaN or infinite feature values
    /// - [`PredictError::NonFiniteOutput`] if the model output is not finite
    pub fn predict_probability(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        features.validate()?;
        let raw = self.model.predict(features);
        if !raw.is_finite() {
            return Err(PredictError::NonFiniteOutput(raw));
        }
        Ok(raw.clamp(0.0, 1.0))
    }

    /// Probability, tier, alert flag and contribution breakdown for `features`.
    ///
    /// # Errors
    /// Same as [`predict_probability`](Self::predict_probability).
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictError> {
        let probability = self.predict_probability(features)?;
        let risk_level = get_risk_level(probability);
        let analysis = analyze(features);

        debug!(
            "Predicted {:.3} ({}) for {:?}",
            probability, risk_level, features
        );

        Ok(PredictionResult {
            probability,
            risk_level,
            alert: risk_level.is_alert(),
            analysis,
        })
    }

    /// The model in use
    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    /// Configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Where the current model came from
    pub fn source(&self) -> ModelSource {
        self.source
    }
}

fn train_model(config: &EngineConfig) -> Result<(TrainedModel, TrainingReport), TrainingError> {
    let corpus = SyntheticGenerator::new(config.seed, config.noise_std).generate(config.n_samples)?;
    model::train(
        &corpus,
        &TrainOptions {
            kind: config.model,
            test_fraction: config.test_fraction,
            seed: config.seed,
        },
    )
}
