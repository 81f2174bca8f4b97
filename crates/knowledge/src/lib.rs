//! Catalog knowledge: datasets, embeddings, the semantic index and the
//! retrieval-grounded answer strategies built on top of it.
//!
//! Ingestion flows `dataset` → `indexer` → `semantic_index`; answering flows
//! through `rag`, which embeds the question, retrieves the nearest records and
//! asks the language model to answer from them alone.

pub mod dataset;
pub mod embeddings;
pub mod indexer;
pub mod progress;
pub mod rag;
pub mod semantic_index;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use dataset::{load_csv, parse_csv, DatasetRow};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use indexer::RecordIndexer;
pub use progress::{IngestPhase, ProgressEvent, ProgressReporter};
pub use rag::{
    AnswerStrategy, ExactAttributeStrategy, GeneralInquiryStrategy, GroundedAnswer, Grounder,
    GroundingSettings, StrategySet,
};
pub use semantic_index::SemanticIndex;
pub use types::{Document, ScoredDocument};
pub use vector_index::VectorIndex;
