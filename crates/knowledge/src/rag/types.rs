//! Grounded answer types.

use crate::types::ScoredDocument;
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Reply the grounding prompt asks for when the context lacks the answer.
pub const NOT_FOUND_MARKER: &str = "NOT_FOUND";

/// Maximum snippet length for source references, in graphemes.
const MAX_SNIPPET_LENGTH: usize = 150;

/// A retrieved record that an answer was grounded on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    /// Position of the record in the ingested dataset
    pub document_id: usize,

    /// Cosine similarity to the question
    pub score: f32,

    /// Leading part of the record text
    pub snippet: String,
}

impl SourceRef {
    pub fn from_scored(scored: &ScoredDocument) -> Self {
        Self {
            document_id: scored.document.id(),
            score: scored.score,
            snippet: truncate_snippet(scored.document.text(), MAX_SNIPPET_LENGTH),
        }
    }
}

/// Result of one retrieve-then-ground pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroundedAnswer {
    /// The model answered from the retrieved records.
    Answer { text: String, sources: Vec<SourceRef> },

    /// Nothing relevant was retrieved, or the model reported the context
    /// does not contain the answer.
    NotFound,
}

impl GroundedAnswer {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GroundedAnswer::NotFound)
    }
}

/// Whether model output is the not-found sentinel, ignoring case, whitespace,
/// surrounding quotes and trailing punctuation.
pub fn is_not_found_marker(output: &str) -> bool {
    let trimmed = output
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.' || c == '*')
        .trim();
    trimmed.eq_ignore_ascii_case(NOT_FOUND_MARKER)
}

/// Truncate to at most `max_len` graphemes, breaking at a word boundary.
fn truncate_snippet(text: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_len {
        return text.to_string();
    }

    let truncated = graphemes[..max_len].concat();
    match truncated.rfind(char::is_whitespace) {
        Some(last_space) if last_space > 0 => format!("{}...", &truncated[..last_space]),
        _ => format!("{}...", truncated),
    }
}
