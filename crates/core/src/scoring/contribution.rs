//! Per-feature contribution analysis
//!
//! Explains a prediction by decomposing the generative formula, not the
//! trained regressor: each feature contributes `normalized × weight`, the same
//! terms the synthetic labels were built from. If a retrained model drifts from
//! the generative formula the breakdown will not follow it.

use crate::core_types::{Feature, FeatureVector, Impact};
use crate::scoring::normalizer::normalize;
use serde::{Deserialize, Serialize};

/// One feature's share of the risk estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionEntry {
    /// Which feature, serialized as its display label ("Wind Speed")
    #[serde(with = "feature_label")]
    pub feature: Feature,
    /// `normalized × weight`, rounded to 2 decimals
    pub contribution: f64,
    /// Qualitative label from the normalized value
    pub impact: Impact,
}

mod feature_label {
    use crate::core_types::Feature;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde
    pub fn serialize<S: Serializer>(feature: &Feature, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(feature.label())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Feature, D::Error> {
        let label = String::deserialize(deserializer)?;
        Feature::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("unknown feature label {label:?}")))
    }
}

/// Round to two decimal places
#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Contribution breakdown in canonical feature order
pub fn analyze(features: &FeatureVector) -> Vec<ContributionEntry> {
    normalize(features)
        .iter()
        .map(|(feature, value)| ContributionEntry {
            feature,
            contribution: round2(value * feature.weight()),
            impact: Impact::from_normalized(value),
        })
        .collect()
}
