//! Built-in prompt templates.
//!
//! Each template can be replaced by a YAML file with the same id in the
//! workspace prompts directory.

use crate::types::PromptDefinition;

/// Grounded answer synthesis over retrieved catalog records.
pub const RAG_ANSWER: &str = "rag.answer";

/// Thought/Action/Observation protocol that drives the intent router.
pub const AGENT_ROUTER: &str = "agent.router";

/// Translation of the incoming question into the catalog's language.
pub const QUERY_TRANSLATE: &str = "query.translate";

const RAG_ANSWER_TEMPLATE: &str = r#"You are an AI assistant specialized in answering questions about products based on the provided context.
Answer the question only based on the context provided.
If the answer is not found in the context, reply with exactly {{not_found_marker}} and nothing else.
Do not make up any information.
Keep the answer concise and relevant.

When the question asks for a list of products or items, present them as a numbered list (e.g., 1. Item One, 2. Item Two, 3. Item Three), one item per line.
If there is only one item, just state the item name in a plain sentence.

Context:
{{context}}

Question: {{question}}
Answer in the same language as the question.
"#;

const AGENT_ROUTER_TEMPLATE: &str = r#"Answer the following questions as best you can. You have access to the following tools:

{{strategies}}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{strategy_names}}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question. When the observation contains a list with numbering or bullet points, ensure that the final answer preserves that formatting.

Here are some examples to guide your thought process and tool usage:

# Example 1: Asking for price and stock of a specific product
Question: How much does the Bicycle cost and what is its stock quantity?
Thought: The user is asking for the price and stock of a specific product, "Bicycle". The `get_product_price_and_stock` tool is designed for this. I need to provide the exact product name as input.
Action: get_product_price_and_stock
Action Input: Bicycle
Observation: The price of Bicycle is 234 USD and the stock quantity is 394.
Thought: I have successfully retrieved the price and stock quantity for the Bicycle. I can now provide the final answer to the user.
Final Answer: The price of Bicycle is 234 USD and the stock quantity is 394.

# Example 2: Asking for general product information or a list of products by feature, expect numbered list
Question: What kinds of wireless products are available?
Thought: The user is asking for a list of products based on a general attribute "wireless", not a specific price or stock query. The `answer_product_question` tool is suitable for general inquiries and listing products by attributes. I should pass the question to this tool.
Action: answer_product_question
Action Input: What kinds of wireless products are available?
Observation: Please see the following wireless products:
1. Wireless Tablet Router Printer Wireless Premium Air
2. Wireless Dock
3. Advanced Router Rechargeable
Thought: I have retrieved the list of wireless products and it is already formatted as a numbered list. I can now provide this as the final answer to the user, preserving the numbering.
Final Answer: Please see the following wireless products:
1. Wireless Tablet Router Printer Wireless Premium Air
2. Wireless Dock
3. Advanced Router Rechargeable

# Example 3: Asking for information not found in data
Question: What is the warranty period for product XYZ?
Thought: The user is asking for specific product information. The `answer_product_question` tool can handle general inquiries. I will use it to search for the warranty information.
Action: answer_product_question
Action Input: What is the warranty period for product XYZ?
Observation: I cannot find information about the warranty period for product XYZ in the provided data.
Thought: The tool indicated that the information about the warranty period for product XYZ is not available in the provided data. I should inform the user politely.
Final Answer: I am sorry, I cannot find information about the warranty period for product XYZ in the relevant data.

Begin!

Question: {{question}}
Thought:{{scratchpad}}"#;

const QUERY_TRANSLATE_TEMPLATE: &str = "Translate this query to {{language}}. Respond only with the {{language}} translation, without any additional text or explanation: '{{query}}'";

/// All built-in definitions, in a stable order.
pub fn definitions() -> Vec<PromptDefinition> {
    vec![
        definition(
            RAG_ANSWER,
            "Grounded product answer",
            &["context", "question", "not_found_marker"],
            RAG_ANSWER_TEMPLATE,
        ),
        definition(
            AGENT_ROUTER,
            "Strategy routing protocol",
            &["strategies", "strategy_names", "question", "scratchpad"],
            AGENT_ROUTER_TEMPLATE,
        ),
        definition(
            QUERY_TRANSLATE,
            "Query translation",
            &["language", "query"],
            QUERY_TRANSLATE_TEMPLATE,
        ),
    ]
}

fn definition(id: &str, title: &str, variables: &[&str], template: &str) -> PromptDefinition {
    PromptDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: "1.0".to_string(),
        created_by: "builtin".to_string(),
        variables: variables.iter().map(|v| v.to_string()).collect(),
        template: template.to_string(),
    }
}
