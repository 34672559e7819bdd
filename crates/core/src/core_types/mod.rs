//! Core types and shared tables

pub mod feature;
pub mod risk;

pub use feature::{sensor_ranges, Feature, FeatureVector, FEATURE_COUNT, FEATURE_WEIGHTS};
pub use risk::{impact_thresholds, risk_ranges, Impact, RiskLevel};
