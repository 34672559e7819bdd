//! Wildfire Risk Scoring Core Library
//!
//! Estimates a wildfire-risk probability from five environmental measurements
//! (temperature, humidity, wind speed, rainfall, vegetation density) and maps
//! it onto a discrete risk tier.
//!
//! ## Components
//!
//! - **Normalizer** - fixed-bound mapping of raw units to a risk scale
//! - **Synthetic label generator** - seeded training corpus from a known formula
//! - **Risk regressor** - random forest (or least squares) fit on that corpus,
//!   persisted as a single artifact
//! - **Contribution analyzer** - per-feature breakdown of the generative formula
//! - **Risk classifier** - probability to Low / Medium / High / Critical
//!
//! [`RiskEngine`] ties them together: it is built once (load or train) and then
//! answers [`predict`](RiskEngine::predict) calls read-only.

// Core types and shared tables
pub mod core_types;

pub mod engine;
pub mod error;
pub mod model;
pub mod scoring;

// Re-export core types
pub use core_types::{Feature, FeatureVector, Impact, RiskLevel};

// Re-export engine surface
pub use engine::{get_risk_level, EngineConfig, ModelSource, PredictionResult, RiskEngine};
pub use error::{LoadError, PersistError, PredictError, RetrainError, TrainingError};
pub use model::{ForestParams, ModelKind, Regressor, TrainedModel, TrainingReport};
pub use scoring::{analyze, normalize, ContributionEntry, SyntheticGenerator, TrainingCorpus};
