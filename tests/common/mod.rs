//! Shared fixture helpers: build competition bundle layouts on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use podium::config::CompetitionConfig;
use podium::data::{io, layout, Column, Frame};

/// Scratch directories of one evaluation run.
pub struct Bundle {
    _root: tempfile::TempDir,
    pub input_dir: PathBuf,
    pub reference_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Bundle {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create scratch dir");
        let input_dir = root.path().join("input_data");
        let reference_dir = root.path().join("reference_data");
        let output_dir = root.path().join("output");
        Self {
            _root: root,
            input_dir,
            reference_dir,
            output_dir,
        }
    }

    /// Write a labeled training split.
    pub fn write_train(&self, config: &CompetitionConfig, features: &Frame, labels: &Column) {
        let split = &config.train_split;
        let features_path = layout::features_path(&self.input_dir, split);
        fs::create_dir_all(features_path.parent().unwrap()).unwrap();
        io::write_frame(&features_path, features.columns()).unwrap();

        let labels = labels.clone().renamed(config.label_column.clone());
        io::write_column(&layout::labels_path(&self.input_dir, split), &labels).unwrap();
    }

    /// Write an unlabeled evaluation split.
    pub fn write_eval(&self, split: &str, features: &Frame) {
        let features_path = layout::features_path(&self.input_dir, split);
        fs::create_dir_all(features_path.parent().unwrap()).unwrap();
        io::write_frame(&features_path, features.columns()).unwrap();
    }

    /// Write the withheld ground truth for an evaluation split.
    pub fn write_reference(&self, config: &CompetitionConfig, split: &str, truth: &Column) {
        fs::create_dir_all(&self.reference_dir).unwrap();
        let truth = truth.clone().renamed(config.label_column.clone());
        io::write_column(
            &layout::reference_labels_path(&self.reference_dir, split),
            &truth,
        )
        .unwrap();
    }

    /// Prediction artifact path for a split, in the output directory.
    pub fn predictions_path(&self, split: &str) -> PathBuf {
        layout::predictions_path(&self.output_dir, split)
    }

    /// Files currently present in the output directory.
    pub fn output_files(&self) -> Vec<String> {
        if !self.output_dir.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(&self.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// A categorical column.
pub fn categorical(name: &str, values: &[&str]) -> Column {
    Column::Categorical {
        name: name.to_string(),
        values: values.iter().map(|s| s.to_string()).collect(),
    }
}

/// A numeric column.
pub fn numeric(name: &str, values: &[f64]) -> Column {
    Column::Numeric {
        name: name.to_string(),
        values: values.to_vec(),
    }
}

/// A frame of numeric columns.
pub fn numeric_frame(columns: &[(&str, &[f64])]) -> Frame {
    Frame::new(
        columns
            .iter()
            .map(|(name, values)| numeric(name, values))
            .collect(),
    )
    .unwrap()
}

/// Read the cells of a single-column CSV artifact, header excluded.
pub fn read_artifact_cells(path: &Path) -> Vec<String> {
    let column = io::read_frame(path).unwrap().into_columns().pop().unwrap();
    (0..column.len()).map(|row| column.cell(row)).collect()
}
