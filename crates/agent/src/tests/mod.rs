//! End-to-end scenarios for the catalog service with scripted model stubs.

mod reingest;
mod routing;

use crate::CatalogService;
use catalog_core::{AppConfig, AppError, AppResult};
use catalog_knowledge::embeddings::MockProvider;
use catalog_knowledge::{parse_csv, DatasetRow, EmbeddingProvider};
use catalog_llm::{LlmClient, LlmRequest, LlmResponse};
use catalog_prompt::PromptLibrary;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub(crate) const PRODUCTS: &str = "\
Name,Description,Price,Stock
Wireless Dock,Wireless charging dock for phones,49,120
Bluetooth Speaker,Portable wireless speaker with deep bass,89,45
Wireless Mouse,Ergonomic wireless mouse,25,300
Bicycle,City bicycle with basket,234,394
Coffee Maker,Drip coffee machine with timer,75,12
";

/// Router script entry that answers with the latest observation verbatim.
pub(crate) const ECHO_OBSERVATION: &str = "<echo observation>";

pub(crate) fn product_rows() -> Vec<DatasetRow> {
    parse_csv(PRODUCTS.as_bytes()).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PromptKind {
    Translate,
    Route,
    Ground,
}

fn classify(prompt: &str) -> PromptKind {
    if prompt.starts_with("Translate this query") {
        PromptKind::Translate
    } else if prompt.contains("You have access to the following tools") {
        PromptKind::Route
    } else {
        PromptKind::Ground
    }
}

pub(crate) enum Translation {
    /// Return the question unchanged
    Echo,
    Reply(String),
    Fail,
}

/// Language model stub that answers each kind of prompt from a script.
pub(crate) struct ScriptedLlm {
    translation: Translation,
    route_script: Mutex<VecDeque<String>>,
    route_fallback: Option<String>,
    grounding: String,
    calls: Mutex<Vec<(PromptKind, String)>>,
}

impl ScriptedLlm {
    pub fn new(grounding: &str) -> Self {
        Self {
            translation: Translation::Echo,
            route_script: Mutex::new(VecDeque::new()),
            route_fallback: None,
            grounding: grounding.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn routing(self, script: &[&str]) -> Self {
        *self.route_script.lock().unwrap() = script.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Reply used once the route script runs out.
    pub fn routing_forever(mut self, reply: &str) -> Self {
        self.route_fallback = Some(reply.to_string());
        self
    }

    pub fn translating(mut self, translation: Translation) -> Self {
        self.translation = translation;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn prompts(&self, kind: PromptKind) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn translate(&self, prompt: &str) -> AppResult<String> {
        match &self.translation {
            Translation::Echo => {
                let start = prompt.rfind(": '").map(|i| i + 3).unwrap_or(0);
                Ok(prompt[start..].trim_end_matches('\'').to_string())
            }
            Translation::Reply(text) => Ok(text.clone()),
            Translation::Fail => Err(AppError::Llm("translator offline".to_string())),
        }
    }

    fn route(&self, prompt: &str) -> AppResult<String> {
        let next = self
            .route_script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.route_fallback.clone())
            .ok_or_else(|| AppError::Llm("route script exhausted".to_string()))?;

        if next == ECHO_OBSERVATION {
            let observation = last_observation(prompt);
            return Ok(format!(" I now know the final answer\nFinal Answer: {}", observation));
        }
        Ok(next)
    }
}

/// Text of the last `Observation:` in a router prompt's scratchpad.
pub(crate) fn last_observation(prompt: &str) -> String {
    let start = prompt
        .rfind("\nObservation: ")
        .map(|i| i + "\nObservation: ".len())
        .unwrap_or(0);
    let rest = &prompt[start..];
    let end = rest.rfind("\nThought: ").unwrap_or(rest.len());
    rest[..end].to_string()
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        let kind = classify(&request.prompt);
        self.calls
            .lock()
            .unwrap()
            .push((kind, request.prompt.clone()));

        let content = match kind {
            PromptKind::Translate => self.translate(&request.prompt)?,
            PromptKind::Route => self.route(&request.prompt)?,
            PromptKind::Ground => self.grounding.clone(),
        };
        Ok(LlmResponse::text(content, request.model.clone()))
    }
}

pub(crate) fn config(max_steps: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.agent.max_steps = max_steps;
    config.embedding.batch_size = 2;
    config
}

pub(crate) fn service_with(
    llm: Arc<ScriptedLlm>,
    embedder: Arc<dyn EmbeddingProvider>,
    max_steps: usize,
) -> CatalogService {
    CatalogService::new(
        &config(max_steps),
        llm,
        embedder,
        Arc::new(PromptLibrary::builtin().unwrap()),
    )
}

pub(crate) fn service(llm: Arc<ScriptedLlm>) -> CatalogService {
    service_with(llm, Arc::new(MockProvider::new(256)), 15)
}
