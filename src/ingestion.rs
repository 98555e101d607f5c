//! The ingestion phase: train a submitted model, write predictions.
//!
//! Runs once per submission, invoked by the hosting platform. All errors
//! are fatal for the run: predictions for every evaluation split are
//! buffered in memory and only persisted once the whole fit/predict cycle
//! has succeeded, so a failed run never leaves partial artifacts for the
//! scoring phase to score.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::CompetitionConfig;
use crate::data::{io, layout, Column, DataError, Frame};
use crate::model::{AdapterError, ModelAdapter, ModelError, Submission};

/// Fatal ingestion failures.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// What a successful run produced, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSummary {
    /// Rows in the training split.
    pub train_rows: usize,
    /// (split name, prediction rows) per evaluation split, in config order.
    pub splits: Vec<(String, usize)>,
}

/// Orchestrates one full train/predict cycle.
pub struct IngestionRunner<'a> {
    config: &'a CompetitionConfig,
}

impl<'a> IngestionRunner<'a> {
    pub fn new(config: &'a CompetitionConfig) -> Self {
        Self { config }
    }

    /// Train `submission` on the training split and write one prediction
    /// artifact per evaluation split into `output_dir`.
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        submission: &dyn Submission,
    ) -> Result<IngestionSummary, IngestionError> {
        let train = &self.config.train_split;
        let label = &self.config.label_column;

        let features = self.load_features(input_dir, train)?;
        let labels_path = layout::labels_path(input_dir, train);
        let labels = io::read_column(&labels_path, label)?;

        if labels.len() != features.n_rows() {
            return Err(DataError::RowCountMismatch {
                left: layout::features_path(input_dir, train).display().to_string(),
                left_rows: features.n_rows(),
                right: labels_path.display().to_string(),
                right_rows: labels.len(),
            }
            .into());
        }

        info!(split = %train, rows = features.n_rows(), "loaded training split");

        let mut adapter = ModelAdapter::instantiate(submission)?;
        adapter.fit(&features, &labels)?;
        info!(rows = features.n_rows(), "model fitted");

        // Predict every split before persisting anything.
        let mut predictions: Vec<(String, Column)> = Vec::new();
        for split in &self.config.eval_splits {
            let features = self.load_features(input_dir, split)?;
            let column = adapter.predict(&features)?;

            if column.len() != features.n_rows() {
                return Err(DataError::PredictionRows {
                    split: split.clone(),
                    expected: features.n_rows(),
                    got: column.len(),
                }
                .into());
            }

            info!(split = %split, rows = column.len(), "predicted split");
            predictions.push((split.clone(), column.renamed(label.clone())));
        }

        fs::create_dir_all(output_dir).map_err(|source| DataError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut summary = IngestionSummary {
            train_rows: features.n_rows(),
            splits: Vec::with_capacity(predictions.len()),
        };
        let mut written = Vec::new();
        for (split, column) in &predictions {
            let path = layout::predictions_path(output_dir, split);
            if let Err(err) = io::write_column(&path, column) {
                // Do not leave a partial artifact set behind.
                for stale in &written {
                    let _ = fs::remove_file(stale);
                }
                return Err(err.into());
            }
            info!(split = %split, path = %path.display(), "wrote prediction artifact");
            written.push(path);
            summary.splits.push((split.clone(), column.len()));
        }

        Ok(summary)
    }

    /// Load a features file, enforcing that the label column is absent.
    fn load_features(&self, input_dir: &Path, split: &str) -> Result<Frame, DataError> {
        let path = layout::features_path(input_dir, split);
        let frame = io::read_frame(&path)?;

        if frame.column(&self.config.label_column).is_some() {
            return Err(DataError::UnexpectedColumn {
                path,
                column: self.config.label_column.clone(),
            });
        }

        Ok(frame)
    }
}
