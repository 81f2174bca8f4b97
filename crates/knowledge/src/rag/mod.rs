//! Retrieval-grounded answering.
//!
//! A [`Grounder`] retrieves the records nearest a question and asks the
//! language model to answer from them alone. Answer strategies wrap it for
//! the intent router.

pub mod attribute;
pub mod format;
pub mod general;
pub mod grounding;
pub mod strategy;
pub mod types;

pub use attribute::{ExactAttributeStrategy, EXACT_ATTRIBUTE};
pub use format::{numbered_items, renumber_bullets};
pub use general::{GeneralInquiryStrategy, GENERAL_INQUIRY};
pub use grounding::{Grounder, GroundingSettings};
pub use strategy::{AnswerStrategy, StrategySet};
pub use types::{is_not_found_marker, GroundedAnswer, SourceRef, NOT_FOUND_MARKER};
