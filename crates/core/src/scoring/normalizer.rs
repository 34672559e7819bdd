//! Fixed-bound feature normalization
//!
//! Maps raw physical units onto a dimensionless risk-contribution scale using
//! the sensor ranges in [`sensor_ranges`](crate::core_types::sensor_ranges):
//!
//! ```text
//! direct:   (x - lo) / (hi - lo)      temperature, wind speed, vegetation
//! inverted: (hi - x) / (hi - lo)      humidity, rainfall
//! ```
//!
//! No clamping: inputs outside the assumed ranges map outside [0, 1].

use crate::core_types::{Feature, FeatureVector, FEATURE_COUNT};

/// Normalized feature values indexed by [`Feature`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFeatures([f64; FEATURE_COUNT]);

impl NormalizedFeatures {
    /// Normalized value of one feature
    #[inline]
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// `(feature, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(|feature| (feature, self.get(feature)))
    }

    /// Generative weighted sum, the noiseless synthetic risk score
    pub fn weighted_sum(&self) -> f64 {
        self.iter()
            .map(|(feature, value)| value * feature.weight())
            .sum()
    }
}

/// Normalize a single raw value
#[inline]
pub fn normalize_value(feature: Feature, raw: f64) -> f64 {
    let range = feature.sensor_range();
    let span = range.end - range.start;
    if feature.is_inverted() {
        (range.end - raw) / span
    } else {
        (raw - range.start) / span
    }
}

/// Normalize every feature of a vector
pub fn normalize(features: &FeatureVector) -> NormalizedFeatures {
    NormalizedFeatures(Feature::ALL.map(|feature| normalize_value(feature, features.get(feature))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_formulas_match_fixed_bounds() {
        let v = FeatureVector::new(27.5, 50.0, 25.0, 10.0, 0.3);
        let n = normalize(&v);

        assert_relative_eq!(n.get(Feature::Temperature), (27.5 - 10.0) / 35.0);
        assert_relative_eq!(n.get(Feature::Humidity), (90.0 - 50.0) / 80.0);
        assert_relative_eq!(n.get(Feature::WindSpeed), 25.0 / 50.0);
        assert_relative_eq!(n.get(Feature::Rainfall), (20.0 - 10.0) / 20.0);
        assert_eq!(n.get(Feature::Vegetation), 0.3);
    }

    #[test]
    fn test_inverted_features_rise_as_raw_falls() {
        let dry = normalize_value(Feature::Humidity, 15.0);
        let wet = normalize_value(Feature::Humidity, 85.0);
        assert!(dry > wet, "lower humidity should normalize higher");

        let no_rain = normalize_value(Feature::Rainfall, 0.0);
        let heavy_rain = normalize_value(Feature::Rainfall, 20.0);
        assert_eq!(no_rain, 1.0);
        assert_eq!(heavy_rain, 0.0);
    }

    #[test]
    fn test_no_clamping_outside_sensor_range() {
        assert!(normalize_value(Feature::Temperature, 60.0) > 1.0);
        assert!(normalize_value(Feature::WindSpeed, -10.0) < 0.0);
        assert!(normalize_value(Feature::Humidity, 100.0) < 0.0);
    }

    #[test]
    fn test_weighted_sum_of_extremes() {
        let max = normalize(&FeatureVector::new(45.0, 10.0, 50.0, 0.0, 1.0));
        assert_relative_eq!(max.weighted_sum(), 1.1, epsilon = 1e-12);

        let min = normalize(&FeatureVector::new(10.0, 90.0, 0.0, 20.0, 0.0));
        assert_relative_eq!(min.weighted_sum(), 0.0, epsilon = 1e-12);
    }
}
