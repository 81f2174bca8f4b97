//! Retrieve-then-ground answering over the active semantic index.

use crate::embeddings::EmbeddingProvider;
use crate::rag::types::{is_not_found_marker, GroundedAnswer, SourceRef, NOT_FOUND_MARKER};
use crate::types::ScoredDocument;
use crate::vector_index::VectorIndex;
use catalog_core::{AppError, AppResult};
use catalog_llm::{LlmClient, LlmRequest};
use catalog_prompt::{vars, PromptLibrary, RAG_ANSWER};
use std::sync::Arc;

/// Model parameters for grounded answer synthesis.
#[derive(Debug, Clone)]
pub struct GroundingSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub top_k: usize,
}

/// Answers questions from the records of one semantic index.
///
/// Only retrieved records reach the model; nothing outside the index is used
/// as context.
pub struct Grounder {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
    settings: GroundingSettings,
}

impl Grounder {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
        prompts: Arc<PromptLibrary>,
        settings: GroundingSettings,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            prompts,
            settings,
        }
    }

    /// Embed `question` and return the nearest records.
    pub async fn retrieve(&self, question: &str) -> AppResult<Vec<ScoredDocument>> {
        let query_embedding = self.embedder.embed(question).await?;
        self.index.search(&query_embedding, self.settings.top_k)
    }

    /// Answer `question` strictly from retrieved records.
    ///
    /// Returns `NotFound` without calling the model when retrieval is empty.
    /// Model failures are reported as `AppError::Generation`.
    pub async fn ground(&self, question: &str) -> AppResult<GroundedAnswer> {
        let results = self.retrieve(question).await?;

        if results.is_empty() {
            tracing::info!("No records retrieved for question");
            return Ok(GroundedAnswer::NotFound);
        }

        tracing::debug!(
            retrieved = results.len(),
            max_score = results[0].score,
            "Grounding answer"
        );

        let context = build_context(&results);
        let prompt = self.prompts.render(
            RAG_ANSWER,
            vars([
                ("context", context),
                ("question", question.to_string()),
                ("not_found_marker", NOT_FOUND_MARKER.to_string()),
            ]),
        )?;

        let request = LlmRequest::new(prompt.text, &self.settings.model)
            .with_optional_temperature(self.settings.temperature);

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        let text = response.content.trim();
        if text.is_empty() || is_not_found_marker(text) {
            return Ok(GroundedAnswer::NotFound);
        }

        Ok(GroundedAnswer::Answer {
            text: text.to_string(),
            sources: results.iter().map(SourceRef::from_scored).collect(),
        })
    }
}

/// Join retrieved record texts, nearest first.
fn build_context(results: &[ScoredDocument]) -> String {
    results
        .iter()
        .map(|r| r.document.text())
        .collect::<Vec<_>>()
        .join("\n\n")
}
