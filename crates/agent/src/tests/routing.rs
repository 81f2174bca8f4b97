//! Routing scenarios: strategy selection, list shape, not-found and step bounds.

use super::*;
use catalog_core::error::UNABLE_TO_ANSWER;
use catalog_knowledge::rag::numbered_items;

const PRICE_ACTION: &str =
    " The user wants a price.\nAction: get_product_price_and_stock\nAction Input: Bicycle";

#[tokio::test]
async fn test_price_question_routes_to_attribute_strategy() {
    let llm = ScriptedLlm::new("The price of Bicycle is 234 USD and the stock quantity is 394.")
        .routing(&[PRICE_ACTION, ECHO_OBSERVATION])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service
        .answer("How much does the Bicycle cost and how many are in stock?")
        .await
        .unwrap();

    assert_eq!(
        outcome.answer,
        "The price of Bicycle is 234 USD and the stock quantity is 394."
    );
    assert_eq!(outcome.steps, 1);

    let grounding = llm.prompts(PromptKind::Ground);
    assert_eq!(grounding.len(), 1);
    assert!(grounding[0].contains("Question: What is the price and stock quantity of Bicycle?"));
    assert!(grounding[0].contains("Name: Bicycle"));
}

#[tokio::test]
async fn test_three_matches_yield_numbered_list() {
    let llm = ScriptedLlm::new("- Wireless Dock\n- Bluetooth Speaker\n- Wireless Mouse")
        .routing(&[
            " A listing question.\nAction: answer_product_question\nAction Input: What kinds of wireless products are available?",
            ECHO_OBSERVATION,
        ])
        .build();
    let service = service(llm);
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service
        .answer("What kinds of wireless products are available?")
        .await
        .unwrap();

    assert_eq!(numbered_items(&outcome.answer).len(), 3);
    assert!(outcome.answer.starts_with("1. Wireless Dock"));
}

#[tokio::test]
async fn test_single_match_is_a_sentence() {
    let llm = ScriptedLlm::new("- Bicycle")
        .routing(&[
            "Action: answer_product_question\nAction Input: Which products come with a basket?",
            ECHO_OBSERVATION,
        ])
        .build();
    let service = service(llm);
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("Which products come with a basket?").await.unwrap();
    assert_eq!(outcome.answer, "Bicycle");
    assert!(numbered_items(&outcome.answer).is_empty());
}

#[tokio::test]
async fn test_single_numbered_match_is_a_sentence() {
    let llm = ScriptedLlm::new("1. Bicycle")
        .routing(&[
            "Action: answer_product_question\nAction Input: Which products come with a basket?",
            ECHO_OBSERVATION,
        ])
        .build();
    let service = service(llm);
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("Which products come with a basket?").await.unwrap();
    assert_eq!(outcome.answer, "Bicycle");
}

#[tokio::test]
async fn test_premature_final_answer_is_not_part_of_the_input() {
    let llm = ScriptedLlm::new("The price of Bicycle is 234 USD and the stock quantity is 394.")
        .routing(&[
            "Action: get_product_price_and_stock\nAction Input: Bicycle\nThought: I now know the final answer\nFinal Answer: 234 USD",
            ECHO_OBSERVATION,
        ])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("How much is the Bicycle?").await.unwrap();
    assert_eq!(outcome.steps, 1);

    let grounding = llm.prompts(PromptKind::Ground);
    assert!(grounding[0].contains("Question: What is the price and stock quantity of Bicycle?\n"));
    assert!(!grounding[0].contains("I now know the final answer"));
}

#[tokio::test]
async fn test_absent_entity_is_not_a_number() {
    let llm = ScriptedLlm::new("NOT_FOUND")
        .routing(&[
            "Action: get_product_price_and_stock\nAction Input: Submarine",
            ECHO_OBSERVATION,
        ])
        .build();
    let service = service(llm);
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("How much is the Submarine?").await.unwrap();
    assert_eq!(
        outcome.answer,
        "Could not find specific price and stock information for Submarine in the provided data."
    );
    assert!(!outcome.answer.chars().any(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_unparseable_driver_exhausts_bound() {
    let llm = ScriptedLlm::new("unused")
        .routing_forever("I am not sure what to do here.")
        .build();
    let service = service_with(llm.clone(), Arc::new(MockProvider::new(64)), 4);
    service.ingest(&product_rows()).await.unwrap();

    let err = service.answer("What is this?").await.unwrap_err();
    assert!(matches!(err, AppError::RoutingExhausted { steps: 4 }));
    assert_eq!(err.user_message(), UNABLE_TO_ANSWER);

    let route_prompts = llm.prompts(PromptKind::Route);
    assert_eq!(route_prompts.len(), 4);
    assert!(route_prompts[1].contains("Observation: Invalid format: Could not parse LLM output"));
    assert!(llm.prompts(PromptKind::Ground).is_empty());
}

#[tokio::test]
async fn test_router_model_outage_is_a_labeled_failure() {
    let llm = ScriptedLlm::new("unused").build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let err = service.answer("How much is the Bicycle?").await.unwrap_err();
    match &err {
        AppError::Generation(msg) => assert!(msg.starts_with("Router model failed")),
        other => panic!("expected Generation error, got {:?}", other),
    }
    assert!(err.user_message().starts_with("Failed to process query"));
    assert!(llm.prompts(PromptKind::Ground).is_empty());
}

#[tokio::test]
async fn test_exhaustion_is_deterministic() {
    for _ in 0..3 {
        let llm = ScriptedLlm::new("unused").routing_forever("???").build();
        let service = service_with(llm.clone(), Arc::new(MockProvider::new(64)), 2);
        service.ingest(&product_rows()).await.unwrap();

        let err = service.answer("anything").await.unwrap_err();
        assert!(matches!(err, AppError::RoutingExhausted { steps: 2 }));
        assert_eq!(llm.prompts(PromptKind::Route).len(), 2);
    }
}

#[tokio::test]
async fn test_unknown_strategy_is_observed_not_dispatched() {
    let llm = ScriptedLlm::new("unused")
        .routing(&[
            "Action: get_weather\nAction Input: Bangkok",
            " I cannot help with weather.\nFinal Answer: Sorry, I can only answer product questions.",
        ])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("What's the weather in Bangkok?").await.unwrap();
    assert_eq!(outcome.answer, "Sorry, I can only answer product questions.");
    assert_eq!(outcome.steps, 1);

    let route_prompts = llm.prompts(PromptKind::Route);
    assert!(route_prompts[1].contains(
        "Observation: get_weather is not a valid strategy, try one of [answer_product_question, get_product_price_and_stock]."
    ));
    assert!(llm.prompts(PromptKind::Ground).is_empty());
}

#[tokio::test]
async fn test_router_prompt_lists_strategies() {
    let llm = ScriptedLlm::new("unused")
        .routing(&["Final Answer: Hello!"])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("Hi").await.unwrap();
    assert_eq!(outcome.steps, 0);

    let prompt = &llm.prompts(PromptKind::Route)[0];
    assert!(prompt.contains("should be one of [answer_product_question, get_product_price_and_stock]"));
    assert!(prompt.contains("answer_product_question: Answers general inquiries"));
    assert!(prompt.ends_with("Question: Hi\nThought:"));
}

#[tokio::test]
async fn test_translation_failure_falls_back() {
    let llm = ScriptedLlm::new("unused")
        .translating(Translation::Fail)
        .routing(&["Final Answer: ราคา 234"])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("จักรยานราคาเท่าไหร่").await.unwrap();
    assert_eq!(outcome.normalized_query, "จักรยานราคาเท่าไหร่");
    assert_eq!(outcome.answer, "ราคา 234");
    assert!(llm.prompts(PromptKind::Route)[0].contains("Question: จักรยานราคาเท่าไหร่"));
}

#[tokio::test]
async fn test_translation_is_unquoted() {
    let llm = ScriptedLlm::new("unused")
        .translating(Translation::Reply("  \"How much is the Bicycle?\"\n".to_string()))
        .routing(&["Final Answer: 234 USD"])
        .build();
    let service = service(llm.clone());
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("จักรยานราคาเท่าไหร่").await.unwrap();
    assert_eq!(outcome.normalized_query, "How much is the Bicycle?");
    assert!(llm.prompts(PromptKind::Route)[0].contains("Question: How much is the Bicycle?"));
}

#[tokio::test]
async fn test_empty_translation_falls_back() {
    let llm = ScriptedLlm::new("unused")
        .translating(Translation::Reply("''".to_string()))
        .routing(&["Final Answer: ok"])
        .build();
    let service = service(llm);
    service.ingest(&product_rows()).await.unwrap();

    let outcome = service.answer("Bicycle?").await.unwrap();
    assert_eq!(outcome.normalized_query, "Bicycle?");
}
