//! Vector index abstraction for retrieval.

use crate::types::ScoredDocument;
use catalog_core::AppResult;

/// Read-only nearest-neighbour search over indexed documents.
///
/// Implementations are immutable once built; a new dataset produces a new
/// index rather than mutating an existing one.
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` documents ordered by descending similarity.
    ///
    /// A query vector whose dimension differs from the index is an error.
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<ScoredDocument>>;

    /// Number of indexed documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension shared by every indexed document.
    fn dimensions(&self) -> usize;
}
