//! Per-question router session.

use uuid::Uuid;

/// One completed router step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterStep {
    /// Strategy that was invoked, if the output named a valid one
    pub strategy: Option<String>,

    pub input: String,

    /// Text fed back to the driving model
    pub observation: String,

    /// Model output for this step, truncated at the first `Observation:`
    pub log: String,
}

/// The steps taken while answering one question.
///
/// Created per question and dropped once the answer is returned.
#[derive(Debug, Clone)]
pub struct RouterSession {
    id: Uuid,
    question: String,
    steps: Vec<RouterStep>,
}

impl RouterSession {
    pub fn new(question: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), question)
    }

    pub fn with_id(id: Uuid, question: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
            steps: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn steps(&self) -> &[RouterStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn record(&mut self, step: RouterStep) {
        self.steps.push(step);
    }

    /// Previous steps in the protocol's own format, appended after `Thought:`.
    pub fn scratchpad(&self) -> String {
        self.steps
            .iter()
            .map(|step| {
                format!(
                    "{}\nObservation: {}\nThought: ",
                    step.log, step.observation
                )
            })
            .collect()
    }
}
