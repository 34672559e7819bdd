//! Risk tiers and contribution impact labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability thresholds between risk tiers.
///
/// Each tier is half-open: inclusive lower bound, exclusive upper bound [a, b).
/// Together they cover [0, 1] without overlap; Critical has no upper bound.
pub mod risk_ranges {
    use std::ops::{Range, RangeFrom};

    /// "Low" risk `[0.0, 0.3)`
    pub const LOW: Range<f64> = 0.0..0.3;

    /// "Medium" risk `[0.3, 0.6)`
    pub const MEDIUM: Range<f64> = 0.3..0.6;

    /// "High" risk `[0.6, 0.8)`
    pub const HIGH: Range<f64> = 0.6..0.8;

    /// "Critical" risk `[0.8, ∞)`
    pub const CRITICAL: RangeFrom<f64> = 0.8..;
}

/// Normalized-value thresholds for contribution impact labels (strict `>`).
pub mod impact_thresholds {
    /// Normalized values above this are "High"
    pub const HIGH: f64 = 0.7;

    /// Normalized values above this (and not High) are "Moderate"
    pub const MODERATE: f64 = 0.4;
}

/// Ordinal wildfire risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Probability below 0.3
    Low,
    /// Probability in [0.3, 0.6)
    Medium,
    /// Probability in [0.6, 0.8)
    High,
    /// Probability of 0.8 or above
    Critical,
}

impl RiskLevel {
    /// Classify a risk probability.
    ///
    /// Anything not inside Medium, High or Critical is Low, which includes
    /// negative values and NaN.
    pub fn from_probability(probability: f64) -> Self {
        match probability {
            p if risk_ranges::CRITICAL.contains(&p) => RiskLevel::Critical,
            p if risk_ranges::HIGH.contains(&p) => RiskLevel::High,
            p if risk_ranges::MEDIUM.contains(&p) => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// High and Critical tiers raise an alert
    pub const fn is_alert(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    /// Display name
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative impact of a single feature on the risk estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Normalized value at or below 0.4
    Low,
    /// Normalized value in (0.4, 0.7]
    Moderate,
    /// Normalized value above 0.7
    High,
}

impl Impact {
    /// Label a normalized feature value
    pub fn from_normalized(value: f64) -> Self {
        if value > impact_thresholds::HIGH {
            Impact::High
        } else if value > impact_thresholds::MODERATE {
            Impact::Moderate
        } else {
            Impact::Low
        }
    }

    /// Display name
    pub const fn as_str(self) -> &'static str {
        match self {
            Impact::Low => "Low",
            Impact::Moderate => "Moderate",
            Impact::High => "High",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_are_exact() {
        assert_eq!(RiskLevel::from_probability(0.2999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.5999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.6), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.7999), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.8), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_out_of_domain_probabilities_fall_to_low() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(-0.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(f64::NAN), RiskLevel::Low);
    }

    #[test]
    fn test_alert_only_for_high_and_critical() {
        assert!(!RiskLevel::Low.is_alert());
        assert!(!RiskLevel::Medium.is_alert());
        assert!(RiskLevel::High.is_alert());
        assert!(RiskLevel::Critical.is_alert());
    }

    #[test]
    fn test_impact_thresholds_are_strict() {
        assert_eq!(Impact::from_normalized(0.4), Impact::Low);
        assert_eq!(Impact::from_normalized(0.41), Impact::Moderate);
        assert_eq!(Impact::from_normalized(0.7), Impact::Moderate);
        assert_eq!(Impact::from_normalized(0.71), Impact::High);
        assert_eq!(Impact::from_normalized(-0.2), Impact::Low);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RiskLevel::Critical.to_string(), "Critical");
        assert_eq!(Impact::Moderate.to_string(), "Moderate");
    }
}
