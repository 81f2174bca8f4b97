//! Prompt system for Catalog QA.
//!
//! This crate provides structured prompt management with:
//! - Built-in templates for grounding, routing and translation
//! - YAML-based overrides in `.catalog/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{vars, PromptLibrary};
pub use builtin::{AGENT_ROUTER, QUERY_TRANSLATE, RAG_ANSWER};
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, PromptDefinition};
