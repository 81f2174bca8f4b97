//! Search command handler.

use super::load_catalog;
use catalog_core::{config::AppConfig, AppResult};
use clap::Args;
use std::path::PathBuf;

/// Show the records nearest a query, with similarity scores
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Text to search for
    pub query: String,

    /// Product CSV to load
    #[arg(short, long)]
    pub data: PathBuf,

    /// Number of records to show
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let service = load_catalog(config, &self.data).await?;
        let results = service.search(&self.query, self.top_k).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&results)?;
            println!("{}", json);
            return Ok(());
        }

        if results.is_empty() {
            println!("No matching records.");
            return Ok(());
        }

        for (rank, result) in results.iter().enumerate() {
            println!(
                "{}. [{:.3}] record {}",
                rank + 1,
                result.score,
                result.document.id()
            );
            for line in result.document.text().lines() {
                println!("     {}", line);
            }
        }

        Ok(())
    }
}
