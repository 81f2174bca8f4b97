//! Command handlers for the catalog-qa CLI.

pub mod ask;
pub mod chat;
pub mod prompts;
pub mod search;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use prompts::PromptsCommand;
pub use search::SearchCommand;

use catalog_agent::CatalogService;
use catalog_core::{config::AppConfig, AppResult};
use catalog_knowledge::ProgressReporter;
use std::path::Path;
use std::sync::Arc;

/// Build a service from `config` and ingest the CSV at `data`.
///
/// Ingestion progress goes to stderr so stdout carries only answers.
pub(crate) async fn load_catalog(config: &AppConfig, data: &Path) -> AppResult<CatalogService> {
    let progress = ProgressReporter::new(Arc::new(|event| {
        eprintln!("{}", event.format_simple());
    }));

    let service = CatalogService::from_config(config)?.with_progress(progress);

    eprintln!("Loading {}...", data.display());
    let status = service.ingest_csv(data).await?;
    eprintln!("Indexed {} records", status.documents);

    Ok(service)
}
