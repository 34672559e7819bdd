//! C ABI for the wildfire risk engine.
//!
//! Every entry point returns a [`FireRiskErrorCode`]; on failure the message is
//! available from [`fire_risk_get_last_error`] on the same thread. Handles are
//! opaque `FireRiskInstance` pointers from [`fire_risk_new`].

mod error;
mod helpers;
mod instance;

pub use error::{fire_risk_get_last_error, fire_risk_get_last_error_code, FireRiskErrorCode};
pub use instance::{fire_risk_destroy, fire_risk_new, FireRiskInstance};

use fire_risk_core::{ContributionEntry, FeatureVector, Impact, PredictionResult, RiskLevel};

use crate::error::DefaultFireRiskError;
use crate::helpers::{instance_from_ptr, track_error, track_result};

/// Number of entries in [`FireRiskPrediction::contributions`]
pub const FIRE_RISK_FEATURE_COUNT: usize = 5;

/// Discrete risk tier.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRiskLevel {
    /// Probability below 0.3
    Low = 0,
    /// Probability in [0.3, 0.6)
    Medium = 1,
    /// Probability in [0.6, 0.8)
    High = 2,
    /// Probability of 0.8 or more
    Critical = 3,
}

impl From<RiskLevel> for FireRiskLevel {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => FireRiskLevel::Low,
            RiskLevel::Medium => FireRiskLevel::Medium,
            RiskLevel::High => FireRiskLevel::High,
            RiskLevel::Critical => FireRiskLevel::Critical,
        }
    }
}

/// Impact band of one feature's contribution.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRiskImpact {
    /// Normalized value at or below 0.4
    Low = 0,
    /// Normalized value above 0.4
    Moderate = 1,
    /// Normalized value above 0.7
    High = 2,
}

impl From<Impact> for FireRiskImpact {
    fn from(impact: Impact) -> Self {
        match impact {
            Impact::Low => FireRiskImpact::Low,
            Impact::Moderate => FireRiskImpact::Moderate,
            Impact::High => FireRiskImpact::High,
        }
    }
}

/// One feature's share of the risk formula.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRiskContribution {
    /// Weighted normalized value, rounded to two decimals
    pub contribution: f64,
    /// Impact band
    pub impact: FireRiskImpact,
}

impl From<&ContributionEntry> for FireRiskContribution {
    fn from(entry: &ContributionEntry) -> Self {
        Self {
            contribution: entry.contribution,
            impact: entry.impact.into(),
        }
    }
}

/// FFI-friendly prediction result. Keep this layout stable for C consumers.
///
/// `contributions` is indexed in canonical feature order: temperature,
/// humidity, wind speed, rainfall, vegetation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireRiskPrediction {
    /// Risk probability in [0, 1]
    pub probability: f64,
    /// Tier derived from `probability`
    pub risk_level: FireRiskLevel,
    /// True for High and Critical tiers
    pub alert: bool,
    /// Per-feature breakdown
    pub contributions: [FireRiskContribution; FIRE_RISK_FEATURE_COUNT],
}

impl From<&PredictionResult> for FireRiskPrediction {
    fn from(result: &PredictionResult) -> Self {
        let mut contributions = [FireRiskContribution {
            contribution: 0.0,
            impact: FireRiskImpact::Low,
        }; FIRE_RISK_FEATURE_COUNT];
        for (slot, entry) in contributions.iter_mut().zip(&result.analysis) {
            *slot = entry.into();
        }

        Self {
            probability: result.probability,
            risk_level: result.risk_level.into(),
            alert: result.alert,
            contributions,
        }
    }
}

/// Score one set of environmental readings.
///
/// Parameters are raw sensor units: °C, %, km/h, mm, and vegetation density in
/// [0, 1]. Values outside the usual sensor ranges are accepted; NaN and
/// infinities are rejected.
///
/// Returns
/// - `FireRiskErrorCode::Ok` - `out_prediction` is filled in
/// - `FireRiskErrorCode::NullPointer` - `ptr` or `out_prediction` is null
/// - `FireRiskErrorCode::InvalidInput` - a reading is NaN or infinite
/// - `FireRiskErrorCode::PredictionFailed` - the model produced a non-finite value
/// - `FireRiskErrorCode::LockPoisoned` - a previous call panicked while holding the engine
///
/// # Safety
/// - `ptr` must be a live pointer returned by `fire_risk_new`.
/// - `out_prediction` must point to writable memory for one `FireRiskPrediction`.
#[no_mangle]
pub unsafe extern "C" fn fire_risk_predict(
    ptr: *const FireRiskInstance,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    rainfall: f64,
    vegetation: f64,
    out_prediction: *mut FireRiskPrediction,
) -> FireRiskErrorCode {
    if out_prediction.is_null() {
        return track_error(&DefaultFireRiskError::null_pointer("out_prediction"));
    }

    let features = FeatureVector::new(temperature, humidity, wind_speed, rainfall, vegetation);
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let engine = instance
            .engine
            .read()
            .map_err(|_| DefaultFireRiskError::lock_poisoned("engine"))?;
        engine
            .predict(&features)
            .map_err(DefaultFireRiskError::from)
    });

    match track_result(result) {
        Ok(result) => {
            unsafe {
                *out_prediction = FireRiskPrediction::from(&result);
            }
            FireRiskErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Classify a probability into a risk tier without an engine.
///
/// NaN and negative inputs classify as `Low`.
#[no_mangle]
pub extern "C" fn fire_risk_get_risk_level(probability: f64) -> FireRiskLevel {
    fire_risk_core::get_risk_level(probability).into()
}

/// Train a replacement model, persist it, and swap it in.
///
/// Predictions keep being served from the current model while training runs.
/// On failure the current model stays in use and the artifact is unchanged.
/// Concurrent calls on the same instance run one after another.
///
/// Returns
/// - `FireRiskErrorCode::Ok` - the new model is live
/// - `FireRiskErrorCode::NullPointer` - `ptr` is null
/// - `FireRiskErrorCode::InitializationFailed` - training failed
/// - `FireRiskErrorCode::PersistFailed` - the new artifact could not be written
/// - `FireRiskErrorCode::LockPoisoned` - a previous call panicked while holding the engine
///
/// # Safety
/// `ptr` must be a live pointer returned by `fire_risk_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_risk_retrain(ptr: *const FireRiskInstance) -> FireRiskErrorCode {
    let result = unsafe { instance_from_ptr(ptr) }.and_then(|instance| {
        let _retrain = instance
            .retrain_lock
            .lock()
            .map_err(|_| DefaultFireRiskError::lock_poisoned("retrain"))?;
        let mut next = instance
            .engine
            .read()
            .map_err(|_| DefaultFireRiskError::lock_poisoned("engine"))?
            .clone();
        next.retrain()?;

        let mut engine = instance
            .engine
            .write()
            .map_err(|_| DefaultFireRiskError::lock_poisoned("engine"))?;
        *engine = next;
        Ok(())
    });

    match track_result(result) {
        Ok(()) => FireRiskErrorCode::Ok,
        Err(code) => code,
    }
}
