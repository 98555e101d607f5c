//! Shared error type for split and artifact data.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading, validating, or persisting tabular data.
///
/// Every variant names the offending file, column, or split so the message
/// can be surfaced verbatim to a submitter.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing file: {path}")]
    MissingFile { path: PathBuf },

    #[error("{path}: file has no header row")]
    EmptyFile { path: PathBuf },

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: column `{column}` must not be present")]
    UnexpectedColumn { path: PathBuf, column: String },

    #[error("inconsistent number of rows: column `{column}` expected {expected}, got {got}")]
    InconsistentRows {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("row count mismatch between {left} ({left_rows} rows) and {right} ({right_rows} rows)")]
    RowCountMismatch {
        left: String,
        left_rows: usize,
        right: String,
        right_rows: usize,
    },

    #[error("split `{split}`: model returned {got} predictions for {expected} input rows")]
    PredictionRows {
        split: String,
        expected: usize,
        got: usize,
    },
}
