//! Intent router: a bounded Thought/Action/Observation loop over the
//! configured answer strategies.

use crate::parser::{parse_router_output, truncate_at_observation, RouterOutput};
use crate::session::{RouterSession, RouterStep};
use catalog_core::{AppError, AppResult};
use catalog_knowledge::StrategySet;
use catalog_llm::{LlmClient, LlmRequest};
use catalog_prompt::{vars, PromptLibrary, AGENT_ROUTER};
use std::sync::Arc;

/// Stop sequence that keeps the driving model from writing its own observations.
const OBSERVATION_STOP: &str = "\nObservation:";

/// Where the router is within one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterState {
    /// Waiting on the driving model.
    Thinking,

    /// The model named a strategy and an input.
    ActionSelected {
        strategy_name: String,
        input: String,
        log: String,
    },

    /// An observation is ready to be recorded and fed back.
    Observing(RouterStep),

    /// The model produced a final answer.
    Done(String),
}

/// The answer and how many steps it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOutcome {
    pub answer: String,
    pub steps: usize,
}

pub struct IntentRouter {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLibrary>,
    model: String,
    temperature: Option<f32>,
    max_steps: usize,
}

impl IntentRouter {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        prompts: Arc<PromptLibrary>,
        model: impl Into<String>,
        max_steps: usize,
    ) -> Self {
        Self {
            llm,
            prompts,
            model: model.into(),
            temperature: None,
            max_steps,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Route `question` through `strategies` until a final answer.
    pub async fn run(&self, question: &str, strategies: &StrategySet) -> AppResult<RouterOutcome> {
        let mut session = RouterSession::new(question);
        self.run_session(&mut session, strategies).await
    }

    /// Drive an existing session to completion.
    ///
    /// Each model turn that does not produce a final answer consumes one
    /// step, so the driving model is called at most `max_steps` times. Fails
    /// with `RoutingExhausted` once the bound is reached.
    pub async fn run_session(
        &self,
        session: &mut RouterSession,
        strategies: &StrategySet,
    ) -> AppResult<RouterOutcome> {
        let mut state = RouterState::Thinking;

        loop {
            state = match state {
                RouterState::Thinking => {
                    if session.step_count() >= self.max_steps {
                        tracing::warn!(
                            steps = session.step_count(),
                            "Router reached its step bound without a final answer"
                        );
                        return Err(AppError::RoutingExhausted {
                            steps: session.step_count(),
                        });
                    }

                    let raw = self.think(session, strategies).await?;
                    let log = truncate_at_observation(&raw).to_string();

                    match parse_router_output(&raw) {
                        RouterOutput::FinalAnswer { text } => RouterState::Done(text),
                        RouterOutput::Action {
                            strategy_name,
                            input,
                        } => RouterState::ActionSelected {
                            strategy_name,
                            input,
                            log,
                        },
                        RouterOutput::Unparseable { reason } => {
                            tracing::warn!(step = session.step_count() + 1, "Unparseable router output: {}", reason);
                            RouterState::Observing(RouterStep {
                                strategy: None,
                                input: String::new(),
                                observation: format!("Invalid format: {}", reason),
                                log,
                            })
                        }
                    }
                }

                RouterState::ActionSelected {
                    strategy_name,
                    input,
                    log,
                } => {
                    let step = match strategies.get(&strategy_name) {
                        Some(strategy) => {
                            tracing::info!(
                                step = session.step_count() + 1,
                                strategy = %strategy_name,
                                "Invoking strategy"
                            );
                            let observation = strategy.answer(&input).await;
                            RouterStep {
                                strategy: Some(strategy_name),
                                input,
                                observation,
                                log,
                            }
                        }
                        None => {
                            tracing::warn!(strategy = %strategy_name, "Model selected an unknown strategy");
                            RouterStep {
                                strategy: None,
                                observation: format!(
                                    "{} is not a valid strategy, try one of [{}].",
                                    strategy_name,
                                    strategies.names().join(", ")
                                ),
                                input,
                                log,
                            }
                        }
                    };
                    RouterState::Observing(step)
                }

                RouterState::Observing(step) => {
                    tracing::debug!(observation = %step.observation, "Observation");
                    session.record(step);
                    RouterState::Thinking
                }

                RouterState::Done(answer) => {
                    tracing::info!(steps = session.step_count(), "Router finished");
                    return Ok(RouterOutcome {
                        answer,
                        steps: session.step_count(),
                    });
                }
            };
        }
    }

    async fn think(&self, session: &RouterSession, strategies: &StrategySet) -> AppResult<String> {
        let prompt = self.prompts.render(
            AGENT_ROUTER,
            vars([
                ("strategies", strategies.describe()),
                ("strategy_names", strategies.names().join(", ")),
                ("question", session.question().to_string()),
                ("scratchpad", session.scratchpad()),
            ]),
        )?;

        let request = LlmRequest::new(prompt.text, &self.model)
            .with_optional_temperature(self.temperature)
            .with_stop(OBSERVATION_STOP);

        let response = self
            .llm
            .complete(&request)
            .await
            .map_err(|e| AppError::Generation(format!("Router model failed: {}", e)))?;

        tracing::trace!(output = %response.content, "Router model output");
        Ok(response.content)
    }
}
