//! Exact price and stock lookups for a named product.

use crate::rag::grounding::Grounder;
use crate::rag::strategy::AnswerStrategy;
use crate::rag::types::GroundedAnswer;
use std::sync::Arc;

pub const EXACT_ATTRIBUTE: &str = "get_product_price_and_stock";

const DESCRIPTION: &str = "Retrieves the exact price and current stock quantity of a specific product. \
Use this tool ONLY when the user explicitly asks for the 'price', 'cost', 'how much', 'stock', 'quantity', 'available', or 'remaining' \
of a PARTICULAR, NAMED product (e.g., 'Laptop Pro', 'Smart Phone'). \
The input must be the exact name of the product you are asking about, in English.";

// Refusals from models that ignore the NOT_FOUND instruction
const NOT_FOUND_PHRASES: &[&str] = &["not found", "no information", "cannot find"];

pub struct ExactAttributeStrategy {
    grounder: Arc<Grounder>,
}

impl ExactAttributeStrategy {
    pub fn new(grounder: Arc<Grounder>) -> Self {
        Self { grounder }
    }
}

fn looks_not_found(text: &str) -> bool {
    let lower = text.to_lowercase();
    NOT_FOUND_PHRASES.iter().any(|p| lower.contains(p))
}

#[async_trait::async_trait]
impl AnswerStrategy for ExactAttributeStrategy {
    fn name(&self) -> &str {
        EXACT_ATTRIBUTE
    }

    fn usage_description(&self) -> &str {
        DESCRIPTION
    }

    async fn answer(&self, input: &str) -> String {
        let name = input.trim();
        let question = format!("What is the price and stock quantity of {}?", name);
        let not_found = || {
            format!(
                "Could not find specific price and stock information for {} in the provided data.",
                name
            )
        };

        match self.grounder.ground(&question).await {
            Ok(GroundedAnswer::Answer { text, .. }) if looks_not_found(&text) => not_found(),
            Ok(GroundedAnswer::Answer { text, .. }) => text,
            Ok(GroundedAnswer::NotFound) => not_found(),
            Err(e) => {
                tracing::error!("Price and stock lookup failed: {}", e);
                format!("An error occurred while retrieving price and stock: {}", e)
            }
        }
    }
}
