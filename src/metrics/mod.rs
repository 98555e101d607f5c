//! Evaluation metrics over aligned (prediction, truth) pairs.
//!
//! Metrics are deterministic and sensitive only to row alignment: row `i`
//! of the predictions is always compared against row `i` of the truth.
//! Degenerate cases (empty input, a regression metric over non-numeric
//! columns) yield NaN rather than an error; the score report serializes
//! that sentinel as `null`.
//!
//! # Available Metrics
//!
//! ## Classification
//! - [`Accuracy`]: fraction of exact matches
//! - [`BalancedAccuracy`]: mean per-class recall
//! - [`MacroF1`]: unweighted mean per-class F1
//!
//! ## Regression
//! - [`Rmse`]: Root Mean Squared Error
//! - [`Mae`]: Mean Absolute Error

mod classification;
mod regression;

pub use classification::{Accuracy, BalancedAccuracy, MacroF1};
pub use regression::{Mae, Rmse};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::Column;

// =============================================================================
// Metric Trait
// =============================================================================

/// A metric for scoring predictions against ground truth.
///
/// `evaluate` is only called on length-aligned columns; the scoring runner
/// rejects mismatched lengths before any metric runs.
pub trait Metric: Send + Sync {
    /// Evaluate the metric over aligned (prediction, truth) pairs.
    ///
    /// Returns NaN when the metric is undefined for the given inputs.
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Name of the metric (configuration string and score-key suffix).
    fn name(&self) -> &str;
}

// =============================================================================
// MetricKind
// =============================================================================

/// Metric identifier used in configuration files.
///
/// Parses from the same string that appears as the score-key suffix, so a
/// config naming `"accuracy"` produces leaderboard keys like
/// `test_accuracy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Accuracy,
    BalancedAccuracy,
    MacroF1,
    Rmse,
    Mae,
}

impl MetricKind {
    /// The metric implementation behind this identifier.
    pub fn metric(&self) -> &'static dyn Metric {
        match self {
            MetricKind::Accuracy => &Accuracy,
            MetricKind::BalancedAccuracy => &BalancedAccuracy,
            MetricKind::MacroF1 => &MacroF1,
            MetricKind::Rmse => &Rmse,
            MetricKind::Mae => &Mae,
        }
    }

    /// Configuration name of the metric.
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Accuracy => "accuracy",
            MetricKind::BalancedAccuracy => "balanced_accuracy",
            MetricKind::MacroF1 => "macro_f1",
            MetricKind::Rmse => "rmse",
            MetricKind::Mae => "mae",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a metric name that is not in the registry.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown metric `{0}` (expected one of: accuracy, balanced_accuracy, macro_f1, rmse, mae)")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accuracy" => Ok(MetricKind::Accuracy),
            "balanced_accuracy" => Ok(MetricKind::BalancedAccuracy),
            "macro_f1" => Ok(MetricKind::MacroF1),
            "rmse" => Ok(MetricKind::Rmse),
            "mae" => Ok(MetricKind::Mae),
            other => Err(UnknownMetric(other.to_string())),
        }
    }
}

impl Serialize for MetricKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for MetricKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
