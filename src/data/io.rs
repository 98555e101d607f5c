//! CSV loading and atomic artifact persistence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::data::{Column, DataError, Frame};

/// Load a feature frame from a CSV file.
///
/// Column types are inferred per [`Column::infer`]. Ragged rows surface as
/// a CSV error naming the file.
pub fn read_frame(path: &Path) -> Result<Frame, DataError> {
    if !path.exists() {
        return Err(DataError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(DataError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        for (i, cell) in record.iter().enumerate() {
            cells[i].push(cell.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::infer(name, values))
        .collect();

    Frame::new(columns)
}

/// Load one named column (labels or predictions) from a CSV file.
pub fn read_column(path: &Path, column: &str) -> Result<Column, DataError> {
    let frame = read_frame(path)?;
    match frame.column(column) {
        Some(col) => Ok(col.clone()),
        None => Err(DataError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        }),
    }
}

/// Write a single-column CSV artifact atomically.
pub fn write_column(path: &Path, column: &Column) -> Result<(), DataError> {
    write_frame(path, std::slice::from_ref(column))
}

/// Write columns as a CSV file atomically (temp file + rename).
///
/// The file either appears complete or not at all; a failed run never
/// leaves a partial artifact for the scoring phase to pick up.
pub fn write_frame(path: &Path, columns: &[Column]) -> Result<(), DataError> {
    let n_rows = columns.first().map_or(0, Column::len);
    for col in columns {
        if col.len() != n_rows {
            return Err(DataError::InconsistentRows {
                column: col.name().to_string(),
                expected: n_rows,
                got: col.len(),
            });
        }
    }

    let tmp = tmp_path(path);
    let result = write_csv(&tmp, path, columns, n_rows);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_csv(tmp: &Path, path: &Path, columns: &[Column], n_rows: usize) -> Result<(), DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(tmp).map_err(csv_err)?;
    writer
        .write_record(columns.iter().map(Column::name))
        .map_err(csv_err)?;
    for row in 0..n_rows {
        writer
            .write_record(columns.iter().map(|c| c.cell(row)))
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    drop(writer);

    fs::rename(tmp, path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `path` through a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DataError> {
    let tmp = tmp_path(path);

    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[&str]) -> Column {
        Column::infer(name, values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn write_then_read_round_trips_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        let col = column("label", &["A", "B", "A"]);
        write_column(&path, &col).unwrap();

        let loaded = read_column(&path, "label").unwrap();
        assert_eq!(loaded, col);
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        write_column(&path, &column("label", &["1", "2"])).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["predictions.csv"]);
    }

    #[test]
    fn numeric_cells_round_trip_canonically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");

        let col = Column::Numeric {
            name: "y".into(),
            values: vec![1.0, 2.5, f64::NAN],
        };
        write_column(&path, &col).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "y\n1\n2.5\n\"\"\n");
    }

    #[test]
    fn missing_file_is_a_typed_error() {
        let err = read_frame(Path::new("/nonexistent/features.csv")).unwrap_err();
        assert!(matches!(err, DataError::MissingFile { .. }));
    }

    #[test]
    fn missing_column_names_the_file_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.csv");
        write_column(&path, &column("other", &["1"])).unwrap();

        let err = read_column(&path, "label").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("labels.csv"));
        assert!(message.contains("`label`"));
    }

    #[test]
    fn multi_column_frame_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");

        let cols = vec![column("x0", &["1", "2"]), column("kind", &["a", "b"])];
        write_frame(&path, &cols).unwrap();

        let frame = read_frame(&path).unwrap();
        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.column_names(), vec!["x0", "kind"]);
    }
}
