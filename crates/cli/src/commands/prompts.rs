//! Prompts command handler.

use catalog_core::{config::AppConfig, AppResult};
use catalog_prompt::{builtin, list_prompts, PromptLibrary};
use clap::Args;

/// List prompt templates and which ones the workspace overrides
#[derive(Args, Debug)]
pub struct PromptsCommand {
    /// Print the effective template text
    #[arg(long)]
    pub show: bool,
}

impl PromptsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let prompts_dir = config.prompts_dir();
        let overrides = list_prompts(&prompts_dir)?;

        // Fails on any malformed override file
        let library = PromptLibrary::load(&prompts_dir)?;

        for default in builtin::definitions() {
            let overridden = overrides.contains(&default.id);
            let Some(definition) = library.definition(&default.id) else {
                continue;
            };

            println!(
                "{:<16} {}{}",
                definition.id,
                definition.title,
                if overridden { " (override)" } else { "" }
            );

            if self.show {
                println!("{}\n", definition.template);
            }
        }

        for id in overrides
            .iter()
            .filter(|id| library.definition(id.as_str()).is_none())
        {
            println!("{:<16} (ignored, unknown prompt id)", id);
        }

        Ok(())
    }
}
