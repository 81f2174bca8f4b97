//! Retrieval and grounding scenarios over a small product catalog.


use crate::dataset::{parse_csv, DatasetRow};
use crate::embeddings::MockProvider;
use crate::indexer::RecordIndexer;
use crate::rag::{Grounder, GroundingSettings};
use crate::semantic_index::SemanticIndex;
use catalog_core::{AppError, AppResult};
use catalog_llm::{LlmClient, LlmRequest, LlmResponse};
use catalog_prompt::PromptLibrary;
use std::sync::{Arc, Mutex};

pub(crate) const PRODUCTS: &str = "\
Name,Description,Price,Stock
Wireless Dock,Wireless charging dock for phones,49,120
Bluetooth Speaker,Portable wireless speaker with deep bass,89,45
Wireless Mouse,Ergonomic wireless mouse,25,300
Bicycle,City bicycle with basket,234,394
Coffee Maker,Drip coffee machine with timer,75,12
";

pub(crate) fn product_rows() -> Vec<DatasetRow> {
    parse_csv(PRODUCTS.as_bytes()).unwrap()
}

pub(crate) fn embedder() -> Arc<MockProvider> {
    Arc::new(MockProvider::new(256))
}

pub(crate) async fn product_index(min_score: Option<f32>) -> SemanticIndex {
    RecordIndexer::new(embedder())
        .with_min_score(min_score)
        .index(&product_rows())
        .await
        .unwrap()
}

/// Language model that replies with a fixed text and records every prompt.
pub(crate) struct CannedLlm {
    reply: AppResult<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(AppError::Llm(message.to_string())),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LlmClient for CannedLlm {
    fn provider_name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match &self.reply {
            Ok(text) => Ok(LlmResponse::text(text.clone(), request.model.clone())),
            Err(e) => Err(AppError::Llm(e.to_string())),
        }
    }
}

pub(crate) async fn grounder(llm: Arc<CannedLlm>, min_score: Option<f32>) -> Arc<Grounder> {
    Arc::new(Grounder::new(
        Arc::new(product_index(min_score).await),
        embedder(),
        llm,
        Arc::new(PromptLibrary::builtin().unwrap()),
        GroundingSettings {
            model: "test-model".to_string(),
            temperature: None,
            top_k: 3,
        },
    ))
}
