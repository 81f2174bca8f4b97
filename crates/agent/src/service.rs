//! Catalog service: the two operations a transport shell calls.
//!
//! `ingest` builds a complete catalog off to the side and swaps it in with a
//! single pointer store. `answer` clones the current catalog handle and works
//! against that snapshot, so a concurrent re-ingestion never changes the
//! catalog under a question that is already running.

use crate::normalizer::QueryNormalizer;
use crate::router::IntentRouter;
use crate::session::RouterSession;
use catalog_core::{AppConfig, AppError, AppResult};
use catalog_knowledge::{
    create_provider, load_csv, DatasetRow, EmbeddingProvider, Grounder, GroundingSettings,
    ProgressReporter, RecordIndexer, ScoredDocument, SemanticIndex, StrategySet, VectorIndex,
};
use catalog_llm::{create_client_from_settings, LlmClient};
use catalog_prompt::PromptLibrary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::Instrument;
use uuid::Uuid;

/// One ingested dataset with the strategies bound to it.
struct ActiveCatalog {
    index: Arc<SemanticIndex>,
    strategies: StrategySet,
    generation: u64,
    fingerprint: String,
    ingested_at: DateTime<Utc>,
}

/// Readiness and provenance of the active catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub ready: bool,
    pub documents: usize,
    pub generation: u64,
    pub fingerprint: Option<String>,
    pub ingested_at: Option<DateTime<Utc>>,
}

/// A routed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub answer: String,
    pub normalized_query: String,
    pub steps: usize,
}

pub struct CatalogService {
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    prompts: Arc<PromptLibrary>,
    normalizer: Option<QueryNormalizer>,
    router: IntentRouter,
    grounding: GroundingSettings,
    min_score: Option<f32>,
    batch_size: usize,
    concurrency: usize,
    progress: ProgressReporter,
    active: RwLock<Option<Arc<ActiveCatalog>>>,
    // Serializes writers; answer() never takes it
    ingest_lock: tokio::sync::Mutex<()>,
}

impl CatalogService {
    /// Build a service from configuration, creating the model clients and
    /// loading prompt overrides from the workspace.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let llm = create_client_from_settings(&config.llm)?;
        let embedder = create_provider(&config.embedding)?;
        let prompts = Arc::new(PromptLibrary::load(&config.prompts_dir())?);

        Ok(Self::new(config, llm, embedder, prompts))
    }

    /// Build a service around explicit clients.
    pub fn new(
        config: &AppConfig,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        prompts: Arc<PromptLibrary>,
    ) -> Self {
        let normalizer = config.agent.normalize_queries.then(|| {
            QueryNormalizer::new(
                Arc::clone(&llm),
                Arc::clone(&prompts),
                config.llm.model.clone(),
                config.agent.working_language.clone(),
            )
            .with_temperature(config.llm.temperature)
        });

        let router = IntentRouter::new(
            Arc::clone(&llm),
            Arc::clone(&prompts),
            config.llm.model.clone(),
            config.agent.max_steps,
        )
        .with_temperature(config.llm.temperature);

        Self {
            llm,
            embedder,
            prompts,
            normalizer,
            router,
            grounding: GroundingSettings {
                model: config.llm.model.clone(),
                temperature: config.llm.temperature,
                top_k: config.retrieval.top_k,
            },
            min_score: config.retrieval.min_score,
            batch_size: config.embedding.batch_size,
            concurrency: config.embedding.concurrency,
            progress: ProgressReporter::noop(),
            active: RwLock::new(None),
            ingest_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Report ingestion progress through `progress`.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    fn current(&self) -> Option<Arc<ActiveCatalog>> {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn install(&self, catalog: ActiveCatalog) {
        let mut active = self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *active = Some(Arc::new(catalog));
    }

    /// Index `rows` and make them the active catalog.
    ///
    /// On failure the previously active catalog, if any, stays in place.
    pub async fn ingest(&self, rows: &[DatasetRow]) -> AppResult<CatalogStatus> {
        let _writer = self.ingest_lock.lock().await;
        let generation = self.current().map_or(0, |c| c.generation) + 1;

        let span = tracing::info_span!("ingest", generation, rows = rows.len());

        async {
            let index = RecordIndexer::new(Arc::clone(&self.embedder))
                .with_batch_size(self.batch_size)
                .with_concurrency(self.concurrency)
                .with_min_score(self.min_score)
                .with_progress(self.progress.clone())
                .index(rows)
                .await
                .map_err(|e| {
                    tracing::error!("Ingestion failed, keeping the previous catalog: {}", e);
                    e
                })?;

            let index = Arc::new(index);
            let grounder = Arc::new(Grounder::new(
                Arc::clone(&index) as Arc<dyn VectorIndex>,
                Arc::clone(&self.embedder),
                Arc::clone(&self.llm),
                Arc::clone(&self.prompts),
                self.grounding.clone(),
            ));

            let catalog = ActiveCatalog {
                fingerprint: index.fingerprint(),
                strategies: StrategySet::catalog_defaults(grounder),
                index,
                generation,
                ingested_at: Utc::now(),
            };

            self.install(catalog);
            tracing::info!("Activated catalog generation {}", generation);

            Ok::<_, AppError>(self.status())
        }
        .instrument(span)
        .await
    }

    /// Load a CSV file and ingest its rows.
    pub async fn ingest_csv(&self, path: &Path) -> AppResult<CatalogStatus> {
        let rows = load_csv(path)?;
        self.ingest(&rows).await
    }

    /// Answer a question against the active catalog.
    pub async fn answer(&self, question: &str) -> AppResult<AnswerOutcome> {
        let catalog = self.current().ok_or(AppError::NotReady)?;

        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::Other("Question cannot be empty".to_string()));
        }

        let session_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "answer",
            session = %session_id,
            generation = catalog.generation
        );

        async {
            let normalized_query = match &self.normalizer {
                Some(normalizer) => normalizer.normalize(question).await,
                None => question.to_string(),
            };

            let mut session = RouterSession::with_id(session_id, normalized_query.clone());
            let outcome = self
                .router
                .run_session(&mut session, &catalog.strategies)
                .await?;

            Ok::<_, AppError>(AnswerOutcome {
                answer: outcome.answer,
                normalized_query,
                steps: outcome.steps,
            })
        }
        .instrument(span)
        .await
    }

    /// Retrieve the records nearest `query` without routing or generation.
    pub async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<ScoredDocument>> {
        let catalog = self.current().ok_or(AppError::NotReady)?;
        let embedding = self.embedder.embed(query).await?;
        catalog.index.search(&embedding, top_k)
    }

    pub fn status(&self) -> CatalogStatus {
        match self.current() {
            Some(catalog) => CatalogStatus {
                ready: true,
                documents: catalog.index.len(),
                generation: catalog.generation,
                fingerprint: Some(catalog.fingerprint.clone()),
                ingested_at: Some(catalog.ingested_at),
            },
            None => CatalogStatus {
                ready: false,
                documents: 0,
                generation: 0,
                fingerprint: None,
                ingested_at: None,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}
