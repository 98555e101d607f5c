//! Regression metrics.

use crate::data::Column;

use super::Metric;

/// Numeric views of both columns, or `None` when either side cannot be
/// read as numbers (the metric is then undefined and yields NaN).
fn numeric_pairs(predictions: &Column, truth: &Column) -> Option<(Vec<f64>, Vec<f64>)> {
    Some((predictions.as_numeric()?, truth.as_numeric()?))
}

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - truth)²)).
///
/// Lower is better. NaN on empty or non-numeric input; NaN cells
/// propagate into the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl Metric for Rmse {
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64 {
        debug_assert_eq!(predictions.len(), truth.len());

        if truth.is_empty() {
            return f64::NAN;
        }

        let Some((pred, truth)) = numeric_pairs(predictions, truth) else {
            return f64::NAN;
        };

        let mse = pred
            .iter()
            .zip(truth.iter())
            .map(|(p, t)| {
                let diff = p - t;
                diff * diff
            })
            .sum::<f64>()
            / truth.len() as f64;

        mse.sqrt()
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "rmse"
    }
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - truth|).
///
/// Lower is better, more robust to outliers than RMSE. NaN on empty or
/// non-numeric input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl Metric for Mae {
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64 {
        debug_assert_eq!(predictions.len(), truth.len());

        if truth.is_empty() {
            return f64::NAN;
        }

        let Some((pred, truth)) = numeric_pairs(predictions, truth) else {
            return f64::NAN;
        };

        pred.iter()
            .zip(truth.iter())
            .map(|(p, t)| (p - t).abs())
            .sum::<f64>()
            / truth.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "mae"
    }
}

// =============================================================================
// Tests
// =============================================================================
