//! In-memory tabular data.
//!
//! This is the form in which splits, labels, and predictions travel
//! between the loaders, the model, and the metrics.

use ndarray::Array2;

use crate::data::DataError;

// =============================================================================
// Column
// =============================================================================

/// A single named column.
///
/// Numeric columns store one `f64` per row with NaN for missing cells;
/// categorical columns store the raw cell strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric { name: String, values: Vec<f64> },
    Categorical { name: String, values: Vec<String> },
}

impl Column {
    /// Build a column from raw CSV cells, inferring the variant.
    ///
    /// A column whose non-empty cells all parse as `f64` becomes numeric
    /// (empty cells become NaN); anything else stays categorical.
    pub fn infer(name: impl Into<String>, cells: Vec<String>) -> Self {
        let name = name.into();

        let mut numeric = Vec::with_capacity(cells.len());
        for cell in &cells {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                numeric.push(f64::NAN);
            } else if let Ok(v) = trimmed.parse::<f64>() {
                numeric.push(v);
            } else {
                numeric.clear();
                break;
            }
        }

        if numeric.len() == cells.len() {
            Column::Numeric {
                name,
                values: numeric,
            }
        } else {
            Column::Categorical { name, values: cells }
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        match self {
            Column::Numeric { name, .. } => name,
            Column::Categorical { name, .. } => name,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric { values, .. } => values.len(),
            Column::Categorical { values, .. } => values.len(),
        }
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Same values under a different name.
    pub fn renamed(self, name: impl Into<String>) -> Self {
        match self {
            Column::Numeric { values, .. } => Column::Numeric {
                name: name.into(),
                values,
            },
            Column::Categorical { values, .. } => Column::Categorical {
                name: name.into(),
                values,
            },
        }
    }

    /// Canonical string form of the cell at `row`.
    ///
    /// Numeric cells format via `Display` (so `1.0` renders as `1`) and
    /// NaN renders as the empty cell; this is also what the CSV writer
    /// emits, so values compare equal after a round trip through disk.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric { values, .. } => {
                let v = values[row];
                if v.is_nan() {
                    String::new()
                } else {
                    format!("{v}")
                }
            }
            Column::Categorical { values, .. } => values[row].clone(),
        }
    }

    /// The values as numbers, if the column can be read that way.
    ///
    /// Categorical columns parse cell by cell (empty cells become NaN)
    /// and return `None` on the first cell that is not a number.
    pub fn as_numeric(&self) -> Option<Vec<f64>> {
        match self {
            Column::Numeric { values, .. } => Some(values.clone()),
            Column::Categorical { values, .. } => {
                let mut out = Vec::with_capacity(values.len());
                for cell in values {
                    let trimmed = cell.trim();
                    if trimmed.is_empty() {
                        out.push(f64::NAN);
                    } else {
                        out.push(trimmed.parse::<f64>().ok()?);
                    }
                }
                Some(out)
            }
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// An ordered set of columns with a consistent row count.
///
/// Row order is load-bearing: prediction `i` must correspond to input
/// row `i` all the way from the features file to the score computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Frame {
    /// Create a frame, validating that all columns agree on the row count.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, Column::len);

        for col in &columns {
            if col.len() != n_rows {
                return Err(DataError::InconsistentRows {
                    column: col.name().to_string(),
                    expected: n_rows,
                    got: col.len(),
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// All columns, in file order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consume the frame, yielding its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Column names, in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Dense row-major matrix of the numeric columns, with their names.
    ///
    /// Categorical columns are skipped; returns `None` when no numeric
    /// column exists. NaN cells are preserved for the model to handle.
    pub fn numeric_matrix(&self) -> Option<(Vec<String>, Array2<f64>)> {
        let numeric: Vec<(&str, &[f64])> = self
            .columns
            .iter()
            .filter_map(|c| match c {
                Column::Numeric { name, values } => Some((name.as_str(), values.as_slice())),
                Column::Categorical { .. } => None,
            })
            .collect();

        if numeric.is_empty() {
            return None;
        }

        let n_cols = numeric.len();
        let mut data = Vec::with_capacity(self.n_rows * n_cols);
        for row in 0..self.n_rows {
            for (_, values) in &numeric {
                data.push(values[row]);
            }
        }

        let names = numeric.iter().map(|(n, _)| n.to_string()).collect();
        let matrix = Array2::from_shape_vec((self.n_rows, n_cols), data)
            .expect("shape follows from construction");
        Some((names, matrix))
    }
}

// =============================================================================
// Tests
// =============================================================================
