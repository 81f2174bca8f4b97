//! Tabular dataset rows and CSV loading.

use catalog_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of an ingested dataset: column name to value, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    fields: Vec<(String, String)>,
}

impl DatasetRow {
    /// Create a row from ordered `(column, value)` pairs.
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Ordered `(column, value)` pairs.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of a column, matched case-insensitively.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as one `column: value` line per column, in column order.
    ///
    /// Deterministic and lossless with respect to the row's fields.
    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Read a CSV file with a header row into dataset rows.
pub fn load_csv(path: &Path) -> AppResult<Vec<DatasetRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Dataset(format!("Failed to open {:?}: {}", path, e)))?;

    let rows = parse_csv(file)?;
    tracing::info!("Loaded {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Parse CSV data with a header row into dataset rows.
///
/// Input is RFC 4180: a quoted field must start right after the delimiter,
/// so `a, "b, c"` splits at both commas and is rejected as ragged.
/// Unquoted values are trimmed. Blank header cells are named `column_<n>`.
/// Rows whose field count differs from the header are rejected.
pub fn parse_csv<R: Read>(reader: R) -> AppResult<Vec<DatasetRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| AppError::Dataset(format!("Failed to read CSV header: {}", e)))?
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim_start_matches('\u{feff}').trim();
            if name.is_empty() {
                format!("column_{}", i + 1)
            } else {
                name.to_string()
            }
        })
        .collect();

    if headers.is_empty() {
        return Err(AppError::Dataset("CSV header row is empty".to_string()));
    }

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| {
            AppError::Dataset(format!("Invalid CSV record {}: {}", line + 1, e))
        })?;

        rows.push(DatasetRow::new(
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string)),
        ));
    }

    Ok(rows)
}
