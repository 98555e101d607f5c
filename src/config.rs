//! Competition configuration.
//!
//! Everything a bundle can vary — label column, split names, metric list,
//! leaderboard columns — lives in one explicit struct handed to both
//! runners, instead of process-wide constants. Every field has a default
//! mirroring a two-phase (public/private leaderboard) classification
//! competition, so a config file is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::metrics::MetricKind;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Declarative description of one competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompetitionConfig {
    /// Name of the label column in label files and prediction artifacts.
    /// Must never appear in a features file.
    pub label_column: String,

    /// Name of the labeled training split.
    pub train_split: String,

    /// Evaluation splits, scored in this order.
    pub eval_splits: Vec<String>,

    /// Metrics computed for every evaluation split.
    pub metrics: Vec<MetricKind>,

    /// Score keys the leaderboard declares. Empty means the
    /// `<split>_<metric>` cross product of `eval_splits` and `metrics`.
    pub report_columns: Vec<String>,
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            train_split: "train".to_string(),
            eval_splits: vec!["test".to_string(), "private_test".to_string()],
            metrics: vec![MetricKind::Accuracy],
            report_columns: Vec::new(),
        }
    }
}

impl CompetitionConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Unknown fields and unknown metric names are rejected here, before
    /// either runner starts.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Score key for one (split, metric) pair, e.g. `test_accuracy`.
    pub fn score_key(&self, split: &str, metric: MetricKind) -> String {
        format!("{split}_{metric}")
    }

    /// The score keys the report must contain: the configured
    /// `report_columns`, or the split × metric cross product when none
    /// are declared.
    pub fn resolved_report_columns(&self) -> Vec<String> {
        if !self.report_columns.is_empty() {
            return self.report_columns.clone();
        }

        self.eval_splits
            .iter()
            .flat_map(|split| {
                self.metrics
                    .iter()
                    .map(move |metric| self.score_key(split, *metric))
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_two_phase_classification() {
        let config = CompetitionConfig::default();
        assert_eq!(config.label_column, "label");
        assert_eq!(config.train_split, "train");
        assert_eq!(config.eval_splits, vec!["test", "private_test"]);
        assert_eq!(config.metrics, vec![MetricKind::Accuracy]);
        assert_eq!(
            config.resolved_report_columns(),
            vec!["test_accuracy", "private_test_accuracy"]
        );
    }

    #[test]
    fn parses_partial_json() {
        let config: CompetitionConfig = serde_json::from_str(
            r#"{"label_column": "etiquette", "metrics": ["accuracy", "macro_f1"]}"#,
        )
        .unwrap();
        assert_eq!(config.label_column, "etiquette");
        assert_eq!(
            config.metrics,
            vec![MetricKind::Accuracy, MetricKind::MacroF1]
        );
        // Defaults fill the rest.
        assert_eq!(config.train_split, "train");
    }

    #[test]
    fn rejects_unknown_metric_names() {
        let err = serde_json::from_str::<CompetitionConfig>(r#"{"metrics": ["auc"]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("`auc`"));
    }

    #[test]
    fn explicit_report_columns_win_over_cross_product() {
        let config = CompetitionConfig {
            report_columns: vec!["test_accuracy".to_string(), "duration".to_string()],
            ..Default::default()
        };
        assert_eq!(
            config.resolved_report_columns(),
            vec!["test_accuracy", "duration"]
        );
    }

    #[test]
    fn config_serializes_round_trip() {
        let config = CompetitionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: CompetitionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label_column, config.label_column);
        assert_eq!(back.metrics, config.metrics);
    }
}
