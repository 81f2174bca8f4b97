//! Answer strategy trait and the configured strategy set.

use crate::rag::attribute::ExactAttributeStrategy;
use crate::rag::general::GeneralInquiryStrategy;
use crate::rag::grounding::Grounder;
use std::sync::Arc;

/// A named way of answering one kind of question.
///
/// `answer` never fails: errors are turned into text the router can observe.
#[async_trait::async_trait]
pub trait AnswerStrategy: Send + Sync {
    /// Name the router uses to select this strategy.
    fn name(&self) -> &str;

    /// When to use this strategy and what input it expects.
    fn usage_description(&self) -> &str;

    async fn answer(&self, input: &str) -> String;
}

/// The closed set of strategies available to the router.
#[derive(Clone)]
pub struct StrategySet {
    strategies: Vec<Arc<dyn AnswerStrategy>>,
}

impl StrategySet {
    pub fn new(strategies: Vec<Arc<dyn AnswerStrategy>>) -> Self {
        Self { strategies }
    }

    /// General inquiry and exact attribute lookup, bound to one grounder.
    pub fn catalog_defaults(grounder: Arc<Grounder>) -> Self {
        Self::new(vec![
            Arc::new(GeneralInquiryStrategy::new(Arc::clone(&grounder))),
            Arc::new(ExactAttributeStrategy::new(grounder)),
        ])
    }

    /// Look up a strategy by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn AnswerStrategy>> {
        self.strategies.iter().find(|s| s.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// One `name: description` line per strategy.
    pub fn describe(&self) -> String {
        self.strategies
            .iter()
            .map(|s| format!("{}: {}", s.name(), s.usage_description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl std::fmt::Debug for StrategySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategySet")
            .field("strategies", &self.names())
            .finish()
    }
}
