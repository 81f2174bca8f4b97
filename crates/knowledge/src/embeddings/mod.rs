//! Embedding providers for dataset records and questions.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{MockProvider, OllamaEmbeddingProvider};
