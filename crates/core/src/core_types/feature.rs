//! Environmental feature catalogue
//!
//! The five measurements the risk engine consumes, their assumed sensor ranges
//! and the weighting that defines the synthetic ground truth. Every component
//! that needs a bound or a weight reads it from here, so label generation and
//! contribution analysis cannot drift apart.

use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 5;

/// Assumed physical sensor ranges for each feature.
///
/// These bounds feed both the normalizer (fixed, not learned) and the uniform
/// draws of the synthetic label generator.
/// Note: Rust `Range` types use **inclusive lower bound and exclusive upper bound** [a, b).
pub mod sensor_ranges {
    use std::ops::Range;

    /// Air temperature in °C
    pub const TEMPERATURE: Range<f64> = 10.0..45.0;

    /// Relative humidity in %
    pub const HUMIDITY: Range<f64> = 10.0..90.0;

    /// Wind speed in km/h
    pub const WIND_SPEED: Range<f64> = 0.0..50.0;

    /// Recent rainfall in mm
    pub const RAINFALL: Range<f64> = 0.0..20.0;

    /// Vegetation density index (dimensionless)
    pub const VEGETATION: Range<f64> = 0.0..1.0;
}

/// Generative weight of each feature, in canonical [`Feature::ALL`] order.
///
/// Temperature dominates, then dryness (inverted humidity), wind, and finally
/// rainfall deficit and fuel density.
pub const FEATURE_WEIGHTS: [f64; FEATURE_COUNT] = [0.4, 0.3, 0.2, 0.1, 0.1];

/// One of the environmental measurements, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Air temperature (°C)
    Temperature,
    /// Relative humidity (%)
    Humidity,
    /// Wind speed (km/h)
    WindSpeed,
    /// Recent rainfall (mm)
    Rainfall,
    /// Vegetation density index (0-1)
    Vegetation,
}

impl Feature {
    /// All features in canonical order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::WindSpeed,
        Feature::Rainfall,
        Feature::Vegetation,
    ];

    /// Position of this feature in canonical order
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Feature::Temperature => 0,
            Feature::Humidity => 1,
            Feature::WindSpeed => 2,
            Feature::Rainfall => 3,
            Feature::Vegetation => 4,
        }
    }

    /// Field name as it appears in serialized inputs
    pub const fn key(self) -> &'static str {
        match self {
            Feature::Temperature => "temperature",
            Feature::Humidity => "humidity",
            Feature::WindSpeed => "wind_speed",
            Feature::Rainfall => "rainfall",
            Feature::Vegetation => "vegetation",
        }
    }

    /// Human-readable label used in contribution breakdowns
    pub const fn label(self) -> &'static str {
        match self {
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::WindSpeed => "Wind Speed",
            Feature::Rainfall => "Rainfall",
            Feature::Vegetation => "Vegetation",
        }
    }

    /// Inverse of [`label`](Self::label)
    pub fn from_label(label: &str) -> Option<Self> {
        Feature::ALL.into_iter().find(|feature| feature.label() == label)
    }

    /// Generative weight from [`FEATURE_WEIGHTS`]
    #[inline]
    pub const fn weight(self) -> f64 {
        FEATURE_WEIGHTS[self.index()]
    }

    /// Assumed sensor range from [`sensor_ranges`]
    pub const fn sensor_range(self) -> std::ops::Range<f64> {
        match self {
            Feature::Temperature => sensor_ranges::TEMPERATURE,
            Feature::Humidity => sensor_ranges::HUMIDITY,
            Feature::WindSpeed => sensor_ranges::WIND_SPEED,
            Feature::Rainfall => sensor_ranges::RAINFALL,
            Feature::Vegetation => sensor_ranges::VEGETATION,
        }
    }

    /// Whether a lower raw value means higher risk (humidity, rainfall)
    pub const fn is_inverted(self) -> bool {
        matches!(self, Feature::Humidity | Feature::Rainfall)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw environmental measurements for a single location.
///
/// All five fields are required when deserializing; field order is irrelevant.
/// Only vegetation has a nominal range, the rest are raw sensor floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Wind speed (km/h)
    pub wind_speed: f64,
    /// Recent rainfall (mm)
    pub rainfall: f64,
    /// Vegetation density index (0-1)
    pub vegetation: f64,
}

impl FeatureVector {
    /// Create a feature vector from raw measurements
    pub const fn new(
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        rainfall: f64,
        vegetation: f64,
    ) -> Self {
        Self {
            temperature,
            humidity,
            wind_speed,
            rainfall,
            vegetation,
        }
    }

    /// Build from values in canonical order
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4])
    }

    /// Values in canonical order
    pub const fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.rainfall,
            self.vegetation,
        ]
    }

    /// Raw value of a single feature
    pub const fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::WindSpeed => self.wind_speed,
            Feature::Rainfall => self.rainfall,
            Feature::Vegetation => self.vegetation,
        }
    }

    /// Reject vectors carrying NaN or infinite values.
    ///
    /// Out-of-range but finite values are accepted as-is.
    ///
    /// # Errors
    /// Returns [`PredictError::InvalidInput`] naming the first non-finite feature.
    pub fn validate(&self) -> Result<(), PredictError> {
        match Feature::ALL
            .into_iter()
            .find(|&feature| !self.get(feature).is_finite())
        {
            Some(feature) => Err(PredictError::InvalidInput {
                feature,
                value: self.get(feature),
            }),
            None => Ok(()),
        }
    }
}
