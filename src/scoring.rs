//! The scoring phase: compare predictions to ground truth, write scores.
//!
//! The hosting platform must always receive a parseable `scores.json`,
//! even for a broken submission. Per-split failures (missing or malformed
//! prediction artifacts, misaligned lengths) are therefore captured into
//! the report as sentinel scores plus an `errors` entry; the runner only
//! fails outright when the report itself cannot be produced.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::CompetitionConfig;
use crate::data::{io, layout, Column, DataError};

/// Scoring-side artifact failures.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("missing prediction artifact: {path}")]
    MissingPrediction { path: std::path::PathBuf },

    #[error("{path}: {reason}")]
    Format {
        path: std::path::PathBuf,
        reason: String,
    },

    #[error(transparent)]
    Data(#[from] DataError),
}

// =============================================================================
// ScoreReport
// =============================================================================

/// The structured result of one scoring run.
///
/// Scores map leaderboard keys (`<split>_<metric>`) to values, with NaN
/// as the sentinel for anything that could not be computed. The `errors`
/// map carries one human-readable message per failed split or missing
/// column — the explicit failure flag the platform displays.
#[derive(Debug, Clone, Default)]
pub struct ScoreReport {
    scores: BTreeMap<String, f64>,
    errors: BTreeMap<String, String>,
}

impl ScoreReport {
    /// Record a computed score.
    pub fn insert_score(&mut self, key: impl Into<String>, value: f64) {
        self.scores.insert(key.into(), value);
    }

    /// Record a failure: sentinel scores for all of `keys`, plus one
    /// error message under `context` (a split name or column name).
    pub fn record_failure<I, K>(&mut self, context: &str, keys: I, message: String)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.scores.insert(key.into(), f64::NAN);
        }
        self.errors.insert(context.to_string(), message);
    }

    /// Look up a score by key.
    pub fn score(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Look up a failure message by context.
    pub fn error(&self, context: &str) -> Option<&str> {
        self.errors.get(context).map(String::as_str)
    }

    /// True when no failure was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Deterministic JSON rendering.
    ///
    /// Keys are sorted; NaN scores serialize as `null` (JSON has no NaN,
    /// and serde_json refuses non-finite numbers). Re-running on the same
    /// artifacts yields a byte-identical document.
    pub fn to_json(&self) -> String {
        let mut root = Map::new();
        for (key, &value) in &self.scores {
            let rendered = if value.is_finite() {
                json!(value)
            } else {
                Value::Null
            };
            root.insert(key.clone(), rendered);
        }
        if !self.errors.is_empty() {
            root.insert("errors".to_string(), json!(self.errors));
        }

        serde_json::to_string_pretty(&Value::Object(root))
            .expect("maps of strings and finite numbers always serialize")
    }

    /// Write the report atomically to `path`.
    pub fn write(&self, path: &Path) -> Result<(), DataError> {
        let mut content = self.to_json();
        content.push('\n');
        io::write_atomic(path, content.as_bytes())
    }
}

// =============================================================================
// ScoringRunner
// =============================================================================

/// Computes and persists the metrics for one submission's predictions.
pub struct ScoringRunner<'a> {
    config: &'a CompetitionConfig,
}

impl<'a> ScoringRunner<'a> {
    pub fn new(config: &'a CompetitionConfig) -> Self {
        Self { config }
    }

    /// Score every configured evaluation split and write `scores.json`
    /// into `output_dir`.
    ///
    /// Returns `Err` only when the report cannot be produced at all.
    pub fn run(
        &self,
        predictions_dir: &Path,
        reference_dir: &Path,
        output_dir: &Path,
    ) -> Result<ScoreReport, ScoringError> {
        let mut report = ScoreReport::default();

        for split in &self.config.eval_splits {
            let keys: Vec<String> = self
                .config
                .metrics
                .iter()
                .map(|metric| self.config.score_key(split, *metric))
                .collect();

            match self.score_split(predictions_dir, reference_dir, split) {
                Ok(scores) => {
                    for (key, value) in scores {
                        info!(split = %split, key = %key, value, "computed score");
                        report.insert_score(key, value);
                    }
                }
                Err(err) => {
                    warn!(split = %split, error = %err, "split could not be scored");
                    report.record_failure(split, keys, err.to_string());
                }
            }
        }

        // The platform rejects reports missing a declared column; fill
        // any leftover with the sentinel.
        for column in self.config.resolved_report_columns() {
            if report.score(&column).is_none() {
                report.record_failure(
                    &column,
                    [column.clone()],
                    format!("score `{column}` was not produced by this run"),
                );
            }
        }

        std::fs::create_dir_all(output_dir).map_err(|source| DataError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let scores_path = layout::scores_path(output_dir);
        report.write(&scores_path)?;
        info!(path = %scores_path.display(), "wrote score report");

        Ok(report)
    }

    /// Score one split, or explain why it cannot be scored.
    fn score_split(
        &self,
        predictions_dir: &Path,
        reference_dir: &Path,
        split: &str,
    ) -> Result<Vec<(String, f64)>, ScoringError> {
        let label = &self.config.label_column;

        let predictions_path = layout::predictions_path(predictions_dir, split);
        if !predictions_path.exists() {
            return Err(ScoringError::MissingPrediction {
                path: predictions_path,
            });
        }

        let predictions = self.read_predictions(&predictions_path)?;

        let truth_path = layout::reference_labels_path(reference_dir, split);
        let truth = io::read_column(&truth_path, label)?;

        // Alignment is strictly positional; a length mismatch is fatal for
        // the split, never silently truncated or padded.
        if predictions.len() != truth.len() {
            return Err(DataError::RowCountMismatch {
                left: predictions_path.display().to_string(),
                left_rows: predictions.len(),
                right: truth_path.display().to_string(),
                right_rows: truth.len(),
            }
            .into());
        }

        Ok(self
            .config
            .metrics
            .iter()
            .map(|metric| {
                let value = metric.metric().evaluate(&predictions, &truth);
                (self.config.score_key(split, *metric), value)
            })
            .collect())
    }

    /// Load a prediction artifact, validating its column set.
    fn read_predictions(&self, path: &Path) -> Result<Column, ScoringError> {
        let label = &self.config.label_column;
        let frame = io::read_frame(path)?;

        if frame.n_cols() != 1 || frame.column(label).is_none() {
            return Err(ScoringError::Format {
                path: path.to_path_buf(),
                reason: format!(
                    "expected a single `{label}` column, found {:?}",
                    frame.column_names()
                ),
            });
        }

        Ok(frame
            .into_columns()
            .pop()
            .expect("frame has exactly one column"))
    }
}

// =============================================================================
// Tests
// =============================================================================
