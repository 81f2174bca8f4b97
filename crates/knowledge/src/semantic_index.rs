//! In-memory semantic index over embedded documents.

use crate::types::{Document, ScoredDocument};
use crate::vector_index::VectorIndex;
use catalog_core::{AppError, AppResult};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::sync::Arc;

/// Brute-force cosine-similarity index.
///
/// Built once from documents and their vectors and never mutated afterwards,
/// so it can be shared between concurrent readers without locking.
#[derive(Debug)]
pub struct SemanticIndex {
    documents: Vec<Arc<Document>>,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    dimensions: usize,
    min_score: Option<f32>,
}

impl SemanticIndex {
    /// Build an index from documents and one vector per document.
    ///
    /// Fails if the counts differ, if there are no documents, or if the
    /// vectors do not all share one non-zero dimension.
    pub fn from_entries(documents: Vec<Document>, vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        if documents.is_empty() {
            return Err(AppError::IndexBuild(
                "Cannot build an index with no documents".to_string(),
            ));
        }

        if documents.len() != vectors.len() {
            return Err(AppError::IndexBuild(format!(
                "Got {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let dimensions = vectors[0].len();
        if dimensions == 0 {
            return Err(AppError::IndexBuild("Embedding vectors are empty".to_string()));
        }

        if let Some(pos) = vectors.iter().position(|v| v.len() != dimensions) {
            return Err(AppError::IndexBuild(format!(
                "Vector {} has dimension {}, expected {}",
                pos,
                vectors[pos].len(),
                dimensions
            )));
        }

        let norms = vectors.iter().map(|v| norm(v)).collect();

        Ok(Self {
            documents: documents.into_iter().map(Arc::new).collect(),
            vectors,
            norms,
            dimensions,
            min_score: None,
        })
    }

    /// Drop results scoring below `min_score`. `None` keeps every result.
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    /// SHA-256 over the indexed document texts, in order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for doc in &self.documents {
            hasher.update(doc.text().as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl VectorIndex for SemanticIndex {
    fn search(&self, query_embedding: &[f32], top_k: usize) -> AppResult<Vec<ScoredDocument>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::Embedding(format!(
                "Query vector has dimension {}, index expects {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        if top_k == 0 {
            return Ok(Vec::new());
        }

        let query_norm = norm(query_embedding);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (vector, doc_norm))| {
                (i, cosine(query_embedding, query_norm, vector, *doc_norm))
            })
            .filter(|(_, score)| self.min_score.map_or(true, |floor| *score >= floor))
            .collect();

        // Descending score; equal scores keep dataset order
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(top_k);

        tracing::debug!(
            candidates = self.documents.len(),
            returned = scored.len(),
            "Semantic search"
        );

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredDocument {
                document: Arc::clone(&self.documents[i]),
                score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

// Zero vectors score 0.0 against everything.
fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetRow;

    fn doc(id: usize, name: &str) -> Document {
        Document::from_row(id, &DatasetRow::new([("Name", name)]))
    }

    fn index() -> SemanticIndex {
        SemanticIndex::from_entries(
            vec![doc(0, "a"), doc(1, "b"), doc(2, "c")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
        )
        .unwrap()
    }

    #[test]
    fn test_search_orders_by_score() {
        let results = index().search(&[1.0, 0.1], 3).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.document.id()).collect();
        assert_eq!(ids, vec![0, 2, 1]);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_search_respects_top_k() {
        assert_eq!(index().search(&[1.0, 0.0], 2).unwrap().len(), 2);
        assert_eq!(index().search(&[1.0, 0.0], 10).unwrap().len(), 3);
        assert!(index().search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_dataset_order() {
        let index = SemanticIndex::from_entries(
            vec![doc(0, "x"), doc(1, "y")],
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();
        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].document.id(), 0);
        assert_eq!(results[1].document.id(), 1);
    }

    #[test]
    fn test_min_score_filters() {
        let index = index().with_min_score(Some(0.9));
        let results = index.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id(), 0);
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let result = index().search(&[1.0, 0.0, 0.0], 3);
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }

    #[test]
    fn test_zero_query_scores_zero() {
        let results = index().search(&[0.0, 0.0], 3).unwrap();
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(SemanticIndex::from_entries(vec![], vec![]).is_err());
        assert!(SemanticIndex::from_entries(vec![doc(0, "a")], vec![]).is_err());
        assert!(SemanticIndex::from_entries(
            vec![doc(0, "a"), doc(1, "b")],
            vec![vec![1.0, 0.0], vec![1.0]]
        )
        .is_err());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = index().fingerprint();
        assert_eq!(a, index().fingerprint());
        assert_eq!(a.len(), 64);

        let other = SemanticIndex::from_entries(vec![doc(0, "z")], vec![vec![1.0]]).unwrap();
        assert_ne!(a, other.fingerprint());
    }
}
