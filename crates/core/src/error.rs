//! Error types for Catalog QA.
//!
//! This module defines a unified error enum that covers every error category
//! in the system: configuration, I/O, model calls, dataset parsing, index
//! building, readiness, routing, prompts and serialization.

use thiserror::Error;

/// Message shown to users when the router gives up without an answer.
pub const UNABLE_TO_ANSWER: &str =
    "I'm sorry, I was unable to find an answer to your question. Please try rephrasing it.";

/// Unified error type for Catalog QA.
///
/// All functions in the workspace return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language model provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding service errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Malformed or unreadable tabular input
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Ingestion failed; the previously active catalog stays in place
    #[error("Index build error: {0}")]
    IndexBuild(String),

    /// A question arrived before any successful ingestion
    #[error("Catalog is not ready: upload a dataset first")]
    NotReady,

    /// Language model failure while synthesizing an answer
    #[error("Generation error: {0}")]
    Generation(String),

    /// The router hit its step bound without a final answer
    #[error("Routing exhausted after {steps} steps without a final answer")]
    RoutingExhausted { steps: usize },

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error means no catalog has been ingested yet.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, AppError::NotReady)
    }

    /// Text suitable for returning to an end user at the transport boundary.
    ///
    /// Routing exhaustion is reported as a generic inability to answer; every
    /// other error keeps its label so the caller never returns silence.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotReady => {
                "Please upload a CSV file and initialize the system first.".to_string()
            }
            AppError::RoutingExhausted { .. } => UNABLE_TO_ANSWER.to_string(),
            AppError::IndexBuild(msg) => format!("Failed to process dataset: {}", msg),
            other => format!("Failed to process query: {}", other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
