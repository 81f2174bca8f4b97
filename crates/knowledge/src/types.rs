//! Indexed document types.

use crate::dataset::DatasetRow;
use serde::Serialize;
use std::sync::Arc;

/// The text form of one dataset row, as stored in the semantic index.
///
/// Immutable once built. `id` is the row's position in the ingested dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    id: usize,
    text: String,
    fields: Vec<(String, String)>,
}

impl Document {
    /// Build the document for the row at position `id`.
    pub fn from_row(id: usize, row: &DatasetRow) -> Self {
        Self {
            id,
            text: row.render(),
            fields: row.fields().to_vec(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Rendered `column: value` text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of a column, matched case-insensitively.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value.as_str())
    }
}

/// A retrieved document with its cosine similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument {
    pub document: Arc<Document>,
    pub score: f32,
}
