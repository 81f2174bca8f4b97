//! Ask command handler.
//!
//! Loads a product CSV and answers a single question about it.

use super::load_catalog;
use catalog_core::{config::AppConfig, AppResult};
use clap::Args;
use std::path::PathBuf;

/// Answer one question about a product CSV
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Product CSV to load
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let service = load_catalog(config, &self.data).await?;
        let outcome = service.answer(&self.question).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&outcome)?;
            println!("{}", json);
        } else {
            println!("{}", outcome.answer);
        }

        Ok(())
    }
}
