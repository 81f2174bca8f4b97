//! Record indexer: dataset rows in, semantic index out.

use crate::dataset::DatasetRow;
use crate::embeddings::EmbeddingProvider;
use crate::progress::ProgressReporter;
use crate::semantic_index::SemanticIndex;
use crate::types::Document;
use catalog_core::{AppError, AppResult};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Turns dataset rows into a [`SemanticIndex`].
///
/// Rows become one document each, rendered as `column: value` lines, and are
/// embedded in batches. Any failure abandons the whole build; no partial
/// index is ever returned.
pub struct RecordIndexer {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    concurrency: usize,
    min_score: Option<f32>,
    progress: ProgressReporter,
}

impl RecordIndexer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            batch_size: 32,
            concurrency: 1,
            min_score: None,
            progress: ProgressReporter::noop(),
        }
    }

    /// Records per embedding request. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embedding requests in flight at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Similarity floor applied by the built index.
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Build an index over `rows`, one document per row in row order.
    pub async fn index(&self, rows: &[DatasetRow]) -> AppResult<SemanticIndex> {
        if rows.is_empty() {
            return Err(AppError::IndexBuild("Dataset has no rows".to_string()));
        }

        let total = rows.len();

        let documents: Vec<Document> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Document::from_row(i, row))
            .collect();
        self.progress.rendered(total);

        let texts: Vec<String> = documents.iter().map(|d| d.text().to_string()).collect();
        let vectors = self.embed_all(&texts).await.map_err(|e| match e {
            AppError::IndexBuild(_) => e,
            other => AppError::IndexBuild(other.to_string()),
        })?;

        if vectors.len() != documents.len() {
            return Err(AppError::IndexBuild(format!(
                "Embedded {} of {} records",
                vectors.len(),
                documents.len()
            )));
        }

        let expected = self.provider.dimensions();
        if vectors.iter().any(|v| v.len() != expected) {
            return Err(AppError::IndexBuild(format!(
                "Embedding provider '{}' returned vectors that are not {}-dimensional",
                self.provider.provider_name(),
                expected
            )));
        }

        let index = SemanticIndex::from_entries(documents, vectors)?.with_min_score(self.min_score);
        self.progress.indexed(total);

        tracing::info!(
            documents = total,
            model = self.provider.model_name(),
            dimensions = expected,
            "Built semantic index"
        );

        Ok(index)
    }

    async fn embed_all(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let total = texts.len();
        let done = Arc::new(AtomicUsize::new(0));

        let batches: Vec<(Range<usize>, Vec<String>)> = texts
            .chunks(self.batch_size)
            .enumerate()
            .map(|(i, batch)| {
                let start = i * self.batch_size;
                (start..start + batch.len(), batch.to_vec())
            })
            .collect();

        let embedded: Vec<Vec<Vec<f32>>> = stream::iter(batches)
            .map(|(rows, batch)| {
                let provider = Arc::clone(&self.provider);
                let progress = self.progress.clone();
                let done = Arc::clone(&done);

                async move {
                    let vectors = provider.embed_batch(&batch).await?;
                    if vectors.len() != batch.len() {
                        return Err(AppError::IndexBuild(format!(
                            "Embedding batch for rows {}..{} returned {} vectors",
                            rows.start,
                            rows.end,
                            vectors.len()
                        )));
                    }
                    let completed = done.fetch_add(batch.len(), Ordering::SeqCst) + batch.len();
                    progress.embedded(rows, completed, total);
                    Ok::<_, AppError>(vectors)
                }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(embedded.into_iter().flatten().collect())
    }
}
