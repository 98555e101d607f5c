//! Classification metrics.

use std::collections::BTreeMap;

use crate::data::Column;

use super::Metric;

/// Canonical label strings for cell-wise comparison.
///
/// Both columns go through [`Column::cell`], so a prediction written as
/// `1` compares equal to a truth cell of `1` regardless of which side was
/// inferred as numeric.
fn label_cells(column: &Column) -> Vec<String> {
    (0..column.len()).map(|row| column.cell(row)).collect()
}

// =============================================================================
// Accuracy
// =============================================================================

/// Fraction of predictions that exactly match the truth.
///
/// Higher is better. NaN on empty input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64 {
        debug_assert_eq!(predictions.len(), truth.len());

        if truth.is_empty() {
            return f64::NAN;
        }

        let pred = label_cells(predictions);
        let truth = label_cells(truth);

        let hits = pred.iter().zip(truth.iter()).filter(|(p, t)| p == t).count();
        hits as f64 / truth.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "accuracy"
    }
}

// =============================================================================
// Balanced Accuracy
// =============================================================================

/// Mean of per-class recall over the classes present in the truth.
///
/// Robust to class imbalance: each class contributes equally regardless of
/// its frequency. Higher is better. NaN on empty input.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedAccuracy;

impl Metric for BalancedAccuracy {
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64 {
        debug_assert_eq!(predictions.len(), truth.len());

        if truth.is_empty() {
            return f64::NAN;
        }

        let pred = label_cells(predictions);
        let truth = label_cells(truth);

        // class -> (support, hits)
        let mut per_class: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for (p, t) in pred.iter().zip(truth.iter()) {
            let entry = per_class.entry(t.as_str()).or_default();
            entry.0 += 1;
            if p == t {
                entry.1 += 1;
            }
        }

        let recall_sum: f64 = per_class
            .values()
            .map(|&(support, hits)| hits as f64 / support as f64)
            .sum();
        recall_sum / per_class.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "balanced_accuracy"
    }
}

// =============================================================================
// Macro F1
// =============================================================================

/// Unweighted mean of per-class F1 over the classes present in the truth
/// or the predictions.
///
/// A class with zero precision and recall contributes an F1 of 0. Higher
/// is better. NaN on empty input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroF1;

impl Metric for MacroF1 {
    fn evaluate(&self, predictions: &Column, truth: &Column) -> f64 {
        debug_assert_eq!(predictions.len(), truth.len());

        if truth.is_empty() {
            return f64::NAN;
        }

        let pred = label_cells(predictions);
        let truth = label_cells(truth);

        // class -> (true positives, predicted count, truth count)
        let mut per_class: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
        for (p, t) in pred.iter().zip(truth.iter()) {
            per_class.entry(p.as_str()).or_default().1 += 1;
            per_class.entry(t.as_str()).or_default().2 += 1;
            if p == t {
                per_class.entry(t.as_str()).or_default().0 += 1;
            }
        }

        let f1_sum: f64 = per_class
            .values()
            .map(|&(tp, predicted, support)| {
                if predicted == 0 || support == 0 || tp == 0 {
                    return 0.0;
                }
                let precision = tp as f64 / predicted as f64;
                let recall = tp as f64 / support as f64;
                2.0 * precision * recall / (precision + recall)
            })
            .sum();
        f1_sum / per_class.len() as f64
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "macro_f1"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn labels(values: &[&str]) -> Column {
        Column::Categorical {
            name: "label".into(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[rstest]
    #[case(&["A", "A", "B", "B"], &["A", "A", "B", "B"], 1.0)]
    #[case(&["A", "A", "A", "A"], &["A", "A", "B", "B"], 0.5)]
    #[case(&["B", "B", "B", "B"], &["A", "A", "A", "A"], 0.0)]
    fn accuracy_counts_exact_matches(
        #[case] pred: &[&str],
        #[case] truth: &[&str],
        #[case] expected: f64,
    ) {
        let value = Accuracy.evaluate(&labels(pred), &labels(truth));
        assert_abs_diff_eq!(value, expected);
    }

    #[test]
    fn accuracy_compares_canonical_numeric_cells() {
        let pred = Column::Numeric {
            name: "label".into(),
            values: vec![1.0, 2.0],
        };
        let truth = labels(&["1", "3"]);
        assert_abs_diff_eq!(Accuracy.evaluate(&pred, &truth), 0.5);
    }

    #[test]
    fn accuracy_is_nan_on_empty_input() {
        assert!(Accuracy.evaluate(&labels(&[]), &labels(&[])).is_nan());
    }

    #[test]
    fn balanced_accuracy_weights_classes_equally() {
        // 8 of class A (all correct), 2 of class B (none correct).
        let truth = labels(&["A", "A", "A", "A", "A", "A", "A", "A", "B", "B"]);
        let pred = labels(&["A", "A", "A", "A", "A", "A", "A", "A", "A", "A"]);

        assert_abs_diff_eq!(Accuracy.evaluate(&pred, &truth), 0.8);
        assert_abs_diff_eq!(BalancedAccuracy.evaluate(&pred, &truth), 0.5);
    }

    #[test]
    fn macro_f1_perfect_prediction_is_one() {
        let truth = labels(&["A", "B", "C", "A"]);
        assert_abs_diff_eq!(MacroF1.evaluate(&truth.clone(), &truth), 1.0);
    }

    #[test]
    fn macro_f1_counts_never_predicted_class_as_zero() {
        // Class B never predicted: F1(B) = 0, F1(A) = 2*(3/4)*1/(3/4 + 1).
        let truth = labels(&["A", "A", "A", "B"]);
        let pred = labels(&["A", "A", "A", "A"]);

        let f1_a = 2.0 * (3.0 / 4.0) * 1.0 / (3.0 / 4.0 + 1.0);
        assert_abs_diff_eq!(
            MacroF1.evaluate(&pred, &truth),
            (f1_a + 0.0) / 2.0,
            epsilon = 1e-12
        );
    }
}
