//! Formula-based scoring: normalization, synthetic labels and explanations
//!
//! All three share the weight table and sensor ranges from
//! [`core_types::feature`](crate::core_types::feature).

pub mod contribution;
pub mod normalizer;
pub mod synthetic;

pub use contribution::{analyze, ContributionEntry};
pub use normalizer::{normalize, normalize_value, NormalizedFeatures};
pub use synthetic::{SyntheticGenerator, TrainingCorpus};
