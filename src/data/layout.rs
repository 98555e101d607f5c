//! On-disk layout of a competition bundle.
//!
//! ```text
//! <input_dir>/
//!   train/train_features.csv
//!   train/train_labels.csv
//!   test/test_features.csv
//!   private_test/private_test_features.csv
//! <reference_dir>/
//!   test_labels.csv
//!   private_test_labels.csv
//! <output_dir>/
//!   test_predictions.csv
//!   private_test_predictions.csv
//!   scores.json
//! ```
//!
//! Split names are configuration; only the naming scheme is fixed here.

use std::path::{Path, PathBuf};

/// File name of the score report.
pub const SCORES_FILE: &str = "scores.json";

/// Features file for a split: `<input_dir>/<split>/<split>_features.csv`.
pub fn features_path(input_dir: &Path, split: &str) -> PathBuf {
    input_dir.join(split).join(format!("{split}_features.csv"))
}

/// Labels file for a labeled split: `<input_dir>/<split>/<split>_labels.csv`.
pub fn labels_path(input_dir: &Path, split: &str) -> PathBuf {
    input_dir.join(split).join(format!("{split}_labels.csv"))
}

/// Withheld ground truth for a split: `<reference_dir>/<split>_labels.csv`.
pub fn reference_labels_path(reference_dir: &Path, split: &str) -> PathBuf {
    reference_dir.join(format!("{split}_labels.csv"))
}

/// Prediction artifact for a split: `<dir>/<split>_predictions.csv`.
pub fn predictions_path(dir: &Path, split: &str) -> PathBuf {
    dir.join(format!("{split}_predictions.csv"))
}

/// Score report: `<output_dir>/scores.json`.
pub fn scores_path(output_dir: &Path) -> PathBuf {
    output_dir.join(SCORES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_the_bundle_layout() {
        let input = Path::new("bundle/input_data");
        assert_eq!(
            features_path(input, "private_test"),
            Path::new("bundle/input_data/private_test/private_test_features.csv")
        );
        assert_eq!(
            labels_path(input, "train"),
            Path::new("bundle/input_data/train/train_labels.csv")
        );
        assert_eq!(
            reference_labels_path(Path::new("bundle/reference_data"), "test"),
            Path::new("bundle/reference_data/test_labels.csv")
        );
        assert_eq!(
            predictions_path(Path::new("out"), "test"),
            Path::new("out/test_predictions.csv")
        );
        assert_eq!(scores_path(Path::new("out")), Path::new("out/scores.json"));
    }
}
