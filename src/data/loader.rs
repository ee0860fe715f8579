// ============================================================
// Layer 4 — Labelled CSV Loader
// ============================================================
// Reads a face-mesh CSV export into memory.
//
// Expected layout (one header row, then one example per row):
//
//   x0,y0,z0,x1,...,z467,emotion
//   0.51,0.43,-0.02,...,0.01,happy
//
// Every column except the last is a float feature; the last
// column is the label string. The number of feature columns is
// taken from the header and every row must match it.
//
// Reference: csv crate documentation

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use thiserror::Error;

/// Structural problems with a labelled CSV table.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("table has no data rows")]
    Empty,

    #[error("table needs at least one feature column and a label column, found {0} column(s)")]
    TooFewColumns(usize),

    #[error("row {row}: expected {expected} columns, found {actual}")]
    InconsistentWidth { row: usize, expected: usize, actual: usize },

    #[error("row {row}, column {column}: '{value}' is not a number")]
    BadFloat { row: usize, column: usize, value: String },

    #[error("row {row}: empty label")]
    EmptyLabel { row: usize },
}

/// An in-memory table of feature rows and their label strings.
#[derive(Debug, Clone)]
pub struct LabeledTable {
    /// Column names of the feature columns (label column excluded)
    pub feature_names: Vec<String>,

    /// One Vec per example, each of length `feature_names.len()`
    pub features: Vec<Vec<f32>>,

    /// Raw label strings, parallel to `features`
    pub labels: Vec<String>,
}

impl LabeledTable {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Number of feature columns (D in the model)
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Load a labelled CSV file from disk.
pub fn load_labeled_csv(path: impl AsRef<Path>) -> Result<LabeledTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open dataset '{}'", path.display()))?;

    let table = read_labeled_csv(file)
        .with_context(|| format!("Invalid dataset '{}'", path.display()))?;

    tracing::info!(
        "Loaded {} rows × {} features from '{}'",
        table.len(),
        table.num_features(),
        path.display()
    );
    Ok(table)
}

/// Parse a labelled CSV table from any reader.
pub fn read_labeled_csv<R: std::io::Read>(reader: R) -> Result<LabeledTable, DatasetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|_| DatasetError::Empty)?
        .clone();
    let width = headers.len();
    if width < 2 {
        return Err(DatasetError::TooFewColumns(width));
    }
    let feature_names: Vec<String> = headers
        .iter()
        .take(width - 1)
        .map(str::to_string)
        .collect();

    let mut features = Vec::new();
    let mut labels   = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        // Row numbers in messages are 1-based and count the header
        let row = i + 2;
        let record = record.map_err(|_| DatasetError::InconsistentWidth {
            row,
            expected: width,
            actual:   0,
        })?;

        if record.len() != width {
            return Err(DatasetError::InconsistentWidth {
                row,
                expected: width,
                actual:   record.len(),
            });
        }

        let mut values = Vec::with_capacity(width - 1);
        for (column, field) in record.iter().take(width - 1).enumerate() {
            let value = field.parse::<f32>().map_err(|_| DatasetError::BadFloat {
                row,
                column,
                value: field.to_string(),
            })?;
            values.push(value);
        }

        let label = &record[width - 1];
        if label.is_empty() {
            return Err(DatasetError::EmptyLabel { row });
        }

        features.push(values);
        labels.push(label.to_string());
    }

    if features.is_empty() {
        return Err(DatasetError::Empty);
    }

    Ok(LabeledTable { feature_names, features, labels })
}
