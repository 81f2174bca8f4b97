//! General product inquiries: descriptions, features and listings.

use crate::rag::format::renumber_bullets;
use crate::rag::grounding::Grounder;
use crate::rag::strategy::AnswerStrategy;
use crate::rag::types::GroundedAnswer;
use std::sync::Arc;

pub const GENERAL_INQUIRY: &str = "answer_product_question";

const DESCRIPTION: &str = "Answers general inquiries and provides detailed descriptions about products, \
features, or characteristics by searching through the loaded product data. \
Use this tool for questions like 'What is X?', 'Tell me about Y?', 'What are the features of Z?', \
or to list products based on a general attribute (e.g., 'What kinds of wireless products are available?'). \
Input must be an English question or a query describing the product/attribute.";

const NOT_FOUND_REPLY: &str =
    "I'm sorry, I could not find information to answer that question in the provided product data.";

pub struct GeneralInquiryStrategy {
    grounder: Arc<Grounder>,
}

impl GeneralInquiryStrategy {
    pub fn new(grounder: Arc<Grounder>) -> Self {
        Self { grounder }
    }
}

#[async_trait::async_trait]
impl AnswerStrategy for GeneralInquiryStrategy {
    fn name(&self) -> &str {
        GENERAL_INQUIRY
    }

    fn usage_description(&self) -> &str {
        DESCRIPTION
    }

    async fn answer(&self, input: &str) -> String {
        match self.grounder.ground(input).await {
            Ok(GroundedAnswer::Answer { text, .. }) => renumber_bullets(&text),
            Ok(GroundedAnswer::NotFound) => NOT_FOUND_REPLY.to_string(),
            Err(e) => {
                tracing::error!("General inquiry failed: {}", e);
                format!(
                    "An error occurred while answering the general product question: {}",
                    e
                )
            }
        }
    }
}
