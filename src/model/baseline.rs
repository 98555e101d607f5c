//! Builtin baseline submissions.
//!
//! These are the reference models shipped with the harness: they exercise
//! the full ingestion path, give organizers a known-good submission to
//! smoke-test a bundle with, and set the floor score for a leaderboard.

use std::collections::BTreeMap;
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::data::{Column, Frame};

use super::{AdapterError, Model, ModelFailure, Submission};

/// Name of the column produced by the builtin models. The ingestion
/// runner renames prediction columns to the configured label column
/// before persisting, so this never reaches an artifact.
const PREDICTION: &str = "prediction";

#[derive(Debug, Clone, thiserror::Error)]
#[error("model has not been fitted")]
struct NotFitted;

// =============================================================================
// Baseline registry
// =============================================================================

/// A builtin submission, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    MajorityClass,
    MeanValue,
    NearestCentroid,
}

impl Baseline {
    /// Registry name of this baseline.
    pub fn name(&self) -> &'static str {
        match self {
            Baseline::MajorityClass => "majority_class",
            Baseline::MeanValue => "mean_value",
            Baseline::NearestCentroid => "nearest_centroid",
        }
    }
}

impl FromStr for Baseline {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "majority_class" => Ok(Baseline::MajorityClass),
            "mean_value" => Ok(Baseline::MeanValue),
            "nearest_centroid" => Ok(Baseline::NearestCentroid),
            other => Err(AdapterError::UnknownSubmission(other.to_string())),
        }
    }
}

impl Submission for Baseline {
    fn build(&self) -> Result<Box<dyn Model>, ModelFailure> {
        Ok(match self {
            Baseline::MajorityClass => Box::new(MajorityClass::default()),
            Baseline::MeanValue => Box::new(MeanValue::default()),
            Baseline::NearestCentroid => Box::new(NearestCentroid::default()),
        })
    }
}

/// Look up a builtin submission by registry name.
pub fn builtin(name: &str) -> Result<Baseline, AdapterError> {
    name.parse()
}

// =============================================================================
// MajorityClass
// =============================================================================

/// Predicts the most frequent training label for every row.
///
/// Ties break to the lexicographically smallest label, keeping runs
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    majority: Option<String>,
}

impl Model for MajorityClass {
    fn fit(&mut self, _features: &Frame, labels: &Column) -> Result<(), ModelFailure> {
        if labels.is_empty() {
            return Err("training labels are empty".into());
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in 0..labels.len() {
            *counts.entry(labels.cell(row)).or_default() += 1;
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, &count) in &counts {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((label.as_str(), count));
            }
        }

        self.majority = best.map(|(label, _)| label.to_string());
        Ok(())
    }

    fn predict(&self, features: &Frame) -> Result<Column, ModelFailure> {
        let majority = self.majority.clone().ok_or(NotFitted)?;
        Ok(Column::Categorical {
            name: PREDICTION.into(),
            values: vec![majority; features.n_rows()],
        })
    }
}

// =============================================================================
// MeanValue
// =============================================================================

/// Predicts the mean of the numeric training labels for every row.
#[derive(Debug, Clone, Default)]
pub struct MeanValue {
    mean: Option<f64>,
}

impl Model for MeanValue {
    fn fit(&mut self, _features: &Frame, labels: &Column) -> Result<(), ModelFailure> {
        let values = labels
            .as_numeric()
            .ok_or("training labels are not numeric")?;

        let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err("training labels contain no finite values".into());
        }

        self.mean = Some(finite.iter().sum::<f64>() / finite.len() as f64);
        Ok(())
    }

    fn predict(&self, features: &Frame) -> Result<Column, ModelFailure> {
        let mean = self.mean.ok_or(NotFitted)?;
        Ok(Column::Numeric {
            name: PREDICTION.into(),
            values: vec![mean; features.n_rows()],
        })
    }
}

// =============================================================================
// NearestCentroid
// =============================================================================

/// Per-class centroid classifier over the numeric feature columns.
///
/// NaN cells are treated as 0.0 on both sides of the distance. Prediction
/// requires the same numeric columns the model was fitted on.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroid {
    columns: Vec<String>,
    classes: Vec<String>,
    centroids: Option<Array2<f64>>,
}

impl NearestCentroid {
    fn imputed(matrix: &Array2<f64>) -> Array2<f64> {
        matrix.mapv(|v| if v.is_nan() { 0.0 } else { v })
    }
}

impl Model for NearestCentroid {
    fn fit(&mut self, features: &Frame, labels: &Column) -> Result<(), ModelFailure> {
        if labels.is_empty() {
            return Err("training labels are empty".into());
        }

        let (columns, matrix) = features
            .numeric_matrix()
            .ok_or("no numeric feature columns to fit on")?;
        let matrix = Self::imputed(&matrix);

        // class -> (row sum, count); BTreeMap fixes the class order.
        let mut groups: BTreeMap<String, (Array1<f64>, usize)> = BTreeMap::new();
        for row in 0..matrix.nrows() {
            let label = labels.cell(row);
            let entry = groups
                .entry(label)
                .or_insert_with(|| (Array1::zeros(matrix.ncols()), 0));
            entry.0 += &matrix.row(row);
            entry.1 += 1;
        }

        let mut centroids = Array2::zeros((groups.len(), matrix.ncols()));
        let mut classes = Vec::with_capacity(groups.len());
        for (i, (label, (sum, count))) in groups.into_iter().enumerate() {
            centroids.row_mut(i).assign(&(sum / count as f64));
            classes.push(label);
        }

        self.columns = columns;
        self.classes = classes;
        self.centroids = Some(centroids);
        Ok(())
    }

    fn predict(&self, features: &Frame) -> Result<Column, ModelFailure> {
        let centroids = self.centroids.as_ref().ok_or(NotFitted)?;

        let (columns, matrix) = features
            .numeric_matrix()
            .ok_or("no numeric feature columns to predict on")?;
        if columns != self.columns {
            return Err(format!(
                "numeric feature columns changed between fit ({:?}) and predict ({:?})",
                self.columns, columns
            )
            .into());
        }
        let matrix = Self::imputed(&matrix);

        let mut values = Vec::with_capacity(matrix.nrows());
        for row in 0..matrix.nrows() {
            let x = matrix.row(row);
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (i, centroid) in centroids.rows().into_iter().enumerate() {
                let dist = x
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>();
                if dist < best_dist {
                    best = i;
                    best_dist = dist;
                }
            }
            values.push(self.classes[best].clone());
        }

        Ok(Column::Categorical {
            name: PREDICTION.into(),
            values,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Column {
        Column::Categorical {
            name: "label".into(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn numeric_frame(columns: &[(&str, &[f64])]) -> Frame {
        Frame::new(
            columns
                .iter()
                .map(|(name, values)| Column::Numeric {
                    name: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn builtin_resolves_all_names() {
        assert_eq!(builtin("majority_class").unwrap(), Baseline::MajorityClass);
        assert_eq!(builtin("mean_value").unwrap(), Baseline::MeanValue);
        assert_eq!(
            builtin("nearest_centroid").unwrap(),
            Baseline::NearestCentroid
        );
        assert!(matches!(
            builtin("gradient_boost"),
            Err(AdapterError::UnknownSubmission(_))
        ));
    }

    #[test]
    fn majority_class_predicts_most_frequent_label() {
        let features = numeric_frame(&[("x", &[0.0, 0.0, 0.0])]);
        let mut model = MajorityClass::default();
        model.fit(&features, &labels(&["B", "A", "B"])).unwrap();

        let pred = model.predict(&numeric_frame(&[("x", &[1.0, 2.0])])).unwrap();
        assert_eq!(pred.cell(0), "B");
        assert_eq!(pred.cell(1), "B");
        assert_eq!(pred.len(), 2);
    }

    #[test]
    fn majority_class_breaks_ties_lexicographically() {
        let features = numeric_frame(&[("x", &[0.0, 0.0])]);
        let mut model = MajorityClass::default();
        model.fit(&features, &labels(&["B", "A"])).unwrap();

        let pred = model.predict(&numeric_frame(&[("x", &[1.0])])).unwrap();
        assert_eq!(pred.cell(0), "A");
    }

    #[test]
    fn unfitted_predict_fails() {
        let model = MajorityClass::default();
        let err = model.predict(&numeric_frame(&[("x", &[1.0])])).unwrap_err();
        assert_eq!(err.to_string(), "model has not been fitted");
    }

    #[test]
    fn mean_value_requires_numeric_labels() {
        let features = numeric_frame(&[("x", &[0.0])]);
        let mut model = MeanValue::default();
        let err = model.fit(&features, &labels(&["A"])).unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn mean_value_predicts_label_mean() {
        let features = numeric_frame(&[("x", &[0.0, 0.0, 0.0])]);
        let mut model = MeanValue::default();
        let y = Column::Numeric {
            name: "label".into(),
            values: vec![1.0, 2.0, 3.0],
        };
        model.fit(&features, &y).unwrap();

        let pred = model.predict(&numeric_frame(&[("x", &[9.0])])).unwrap();
        assert_eq!(pred.cell(0), "2");
    }

    #[test]
    fn nearest_centroid_separates_two_clusters() {
        let features = numeric_frame(&[("x0", &[0.0, 0.1, 10.0, 10.1]), ("x1", &[0.0, 0.1, 10.0, 9.9])]);
        let mut model = NearestCentroid::default();
        model.fit(&features, &labels(&["low", "low", "high", "high"])).unwrap();

        let pred = model
            .predict(&numeric_frame(&[("x0", &[0.05, 9.9]), ("x1", &[0.0, 10.0])]))
            .unwrap();
        assert_eq!(pred.cell(0), "low");
        assert_eq!(pred.cell(1), "high");
    }

    #[test]
    fn nearest_centroid_rejects_changed_columns() {
        let mut model = NearestCentroid::default();
        model
            .fit(&numeric_frame(&[("x0", &[0.0, 1.0])]), &labels(&["a", "b"]))
            .unwrap();

        let err = model
            .predict(&numeric_frame(&[("other", &[0.0])]))
            .unwrap_err();
        assert!(err.to_string().contains("changed between fit"));
    }
}
