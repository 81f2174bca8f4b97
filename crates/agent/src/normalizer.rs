//! Query normalizer: translates questions into the catalog's working language.

use catalog_core::AppResult;
use catalog_llm::{LlmClient, LlmRequest};
use catalog_prompt::{vars, PromptLibrary, QUERY_TRANSLATE};
use std::sync::Arc;

/// Characters stripped from both ends of a translation.
const QUOTES: &[char] = &['"', '\'', '`', '“', '”', '‘', '’', '«', '»'];

pub struct QueryNormalizer {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
    model: String,
    temperature: Option<f32>,
    language: String,
}

impl QueryNormalizer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        prompts: Arc<PromptLibrary>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            prompts,
            model: model.into(),
            temperature: None,
            language: language.into(),
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Translate `question` into the working language.
    ///
    /// Never fails: any model error or empty translation yields the original
    /// question unchanged.
    pub async fn normalize(&self, question: &str) -> String {
        match self.translate(question).await {
            Ok(translated) if !translated.is_empty() => {
                tracing::debug!(original = question, translated = %translated, "Normalized query");
                translated
            }
            Ok(_) => {
                tracing::warn!("Translation was empty, using the original question");
                question.to_string()
            }
            Err(e) => {
                tracing::warn!("Translation failed, using the original question: {}", e);
                question.to_string()
            }
        }
    }

    async fn translate(&self, question: &str) -> AppResult<String> {
        let prompt = self.prompts.render(
            QUERY_TRANSLATE,
            vars([
                ("language", self.language.clone()),
                ("query", question.to_string()),
            ]),
        )?;

        let request = LlmRequest::new(prompt.text, &self.model)
            .with_optional_temperature(self.temperature);
        let response = self.llm.complete(&request).await?;

        Ok(strip_quotes(&response.content))
    }
}

fn strip_quotes(text: &str) -> String {
    text.trim().trim_matches(QUOTES).trim().to_string()
}
