//! Chat command handler.
//!
//! Reads questions from stdin, one per line, and answers each against the
//! loaded catalog. `:reload` re-ingests the CSV and `:status` prints the
//! active catalog's provenance.

use super::load_catalog;
use catalog_core::{config::AppConfig, AppResult};
use clap::Args;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Answer questions read from stdin
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Product CSV to load
    #[arg(short, long)]
    pub data: PathBuf,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let service = load_catalog(config, &self.data).await?;
        eprintln!("Ask a question (:reload, :status, :quit)");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();

            match line {
                "" => continue,
                ":quit" | ":exit" => break,
                ":reload" => match service.ingest_csv(&self.data).await {
                    Ok(status) => eprintln!(
                        "Reloaded {} records (generation {})",
                        status.documents, status.generation
                    ),
                    Err(e) => eprintln!("{}", e.user_message()),
                },
                ":status" => {
                    let json = serde_json::to_string_pretty(&service.status())?;
                    println!("{}", json);
                }
                question => match service.answer(question).await {
                    Ok(outcome) => println!("{}\n", outcome.answer),
                    Err(e) => {
                        tracing::warn!("Question failed: {}", e);
                        println!("{}\n", e.user_message());
                    }
                },
            }
        }

        Ok(())
    }
}
