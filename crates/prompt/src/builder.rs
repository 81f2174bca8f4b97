//! Prompt library: resolves definitions and renders them with Handlebars.

use crate::builtin;
use crate::loader::{list_prompts, load_prompt};
use crate::types::{BuiltPrompt, PromptDefinition};
use catalog_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// The set of prompt templates used by one service instance.
///
/// Templates are registered once at construction, so a malformed override
/// fails at startup rather than on the first question.
pub struct PromptLibrary {
    registry: Handlebars<'static>,
    definitions: HashMap<String, PromptDefinition>,
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.definitions.keys().collect();
        ids.sort();
        f.debug_struct("PromptLibrary").field("prompts", &ids).finish()
    }
}

impl PromptLibrary {
    /// Library containing only the built-in templates.
    pub fn builtin() -> AppResult<Self> {
        Self::from_definitions(builtin::definitions())
    }

    /// Built-in templates, replaced by any `<id>.yml` override in `prompts_dir`.
    ///
    /// Override files whose id is not a known prompt are ignored with a warning.
    pub fn load(prompts_dir: &Path) -> AppResult<Self> {
        let mut definitions = builtin::definitions();

        for id in list_prompts(prompts_dir)? {
            match definitions.iter_mut().find(|d| d.id == id) {
                Some(slot) => *slot = load_prompt(prompts_dir, &id)?,
                None => tracing::warn!("Ignoring unknown prompt override: {}", id),
            }
        }

        Self::from_definitions(definitions)
    }

    fn from_definitions(definitions: Vec<PromptDefinition>) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Plain text prompts: no HTML escaping, and fail on missing variables
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        let mut by_id = HashMap::new();
        for def in definitions {
            registry
                .register_template_string(&def.id, &def.template)
                .map_err(|e| {
                    AppError::Prompt(format!("Failed to register template '{}': {}", def.id, e))
                })?;
            by_id.insert(def.id.clone(), def);
        }

        Ok(Self {
            registry,
            definitions: by_id,
        })
    }

    /// Look up the definition for a prompt id.
    pub fn definition(&self, id: &str) -> Option<&PromptDefinition> {
        self.definitions.get(id)
    }

    /// Render a prompt with the given variables.
    pub fn render(&self, id: &str, variables: HashMap<String, String>) -> AppResult<BuiltPrompt> {
        if !self.definitions.contains_key(id) {
            return Err(AppError::Prompt(format!("Unknown prompt: {}", id)));
        }

        let text = self
            .registry
            .render(id, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template '{}': {}", id, e)))?;

        tracing::trace!(prompt = id, len = text.len(), "Rendered prompt");

        Ok(BuiltPrompt {
            text,
            source_prompt_id: id.to_string(),
            resolved_variables: variables,
        })
    }
}

/// Build a variable map from `(name, value)` pairs.
pub fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
