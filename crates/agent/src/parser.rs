//! Parser for the router's Thought/Action/Final Answer protocol.

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

/// Markers that end an action input when the model keeps writing after it.
const INPUT_TERMINATORS: &[&str] = &["\nThought:", "\nFinal Answer:", "\nAction:"];

/// One parsed output of the driving model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterOutput {
    /// Invoke a strategy with the given input.
    Action { strategy_name: String, input: String },

    /// The router is done.
    FinalAnswer { text: String },

    /// Neither an action nor a final answer could be read.
    Unparseable { reason: String },
}

/// Cut model output at the first `Observation:`.
///
/// Anything after it is an observation the model invented.
pub fn truncate_at_observation(output: &str) -> &str {
    match output.find(OBSERVATION) {
        Some(pos) => output[..pos].trim_end(),
        None => output,
    }
}

/// Parse one turn of model output.
///
/// When both an action and a final answer are present the action wins, and
/// its input ends where the model started a new `Thought:` or `Final Answer:`.
pub fn parse_router_output(output: &str) -> RouterOutput {
    let text = truncate_at_observation(output);

    if let Some(action_pos) = text.find(ACTION) {
        let after_action = &text[action_pos + ACTION.len()..];

        let Some(input_pos) = after_action.find(ACTION_INPUT) else {
            return RouterOutput::Unparseable {
                reason: "Missing 'Action Input:' after 'Action:'".to_string(),
            };
        };

        let strategy_name = clean_name(&after_action[..input_pos]);
        if strategy_name.is_empty() {
            return RouterOutput::Unparseable {
                reason: "Missing strategy name after 'Action:'".to_string(),
            };
        }

        let input = clean_input(&after_action[input_pos + ACTION_INPUT.len()..]);
        return RouterOutput::Action {
            strategy_name,
            input,
        };
    }

    if let Some(final_pos) = text.find(FINAL_ANSWER) {
        let answer = text[final_pos + FINAL_ANSWER.len()..].trim();
        if answer.is_empty() {
            return RouterOutput::Unparseable {
                reason: "Empty 'Final Answer:'".to_string(),
            };
        }
        return RouterOutput::FinalAnswer {
            text: answer.to_string(),
        };
    }

    RouterOutput::Unparseable {
        reason: format!(
            "Could not parse LLM output: `{}`",
            text.trim().chars().take(200).collect::<String>()
        ),
    }
}

fn clean_name(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
        .trim_matches(|c: char| c == '`' || c == '"' || c == '\'' || c == '*')
        .trim()
        .to_string()
}

fn clean_input(raw: &str) -> String {
    let end = INPUT_TERMINATORS
        .iter()
        .filter_map(|marker| raw.find(marker))
        .min()
        .unwrap_or(raw.len());
    let trimmed = raw[..end].trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        let output = " The user wants the price.\nAction: get_product_price_and_stock\nAction Input: Bicycle";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::Action {
                strategy_name: "get_product_price_and_stock".to_string(),
                input: "Bicycle".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_final_answer_preserves_list() {
        let output = " I now know the final answer\nFinal Answer: 1. Wireless Dock\n2. Bluetooth Speaker";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::FinalAnswer {
                text: "1. Wireless Dock\n2. Bluetooth Speaker".to_string()
            }
        );
    }

    #[test]
    fn test_hallucinated_observation_is_dropped() {
        let output = "Action: answer_product_question\nAction Input: wireless products\nObservation: made up\nFinal Answer: made up";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::Action {
                strategy_name: "answer_product_question".to_string(),
                input: "wireless products".to_string(),
            }
        );
    }

    #[test]
    fn test_action_wins_over_final_answer() {
        let output = "Final Answer: guess\nAction: answer_product_question\nAction Input: dock";
        assert!(matches!(
            parse_router_output(output),
            RouterOutput::Action { .. }
        ));
    }

    #[test]
    fn test_action_input_stops_at_next_thought() {
        let output = "Action: get_product_price_and_stock\nAction Input: Bicycle\nThought: I now know the final answer\nFinal Answer: 234 USD";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::Action {
                strategy_name: "get_product_price_and_stock".to_string(),
                input: "Bicycle".to_string(),
            }
        );

        let output = "Action: answer_product_question\nAction Input: \"wireless products\"\nFinal Answer: Dock";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::Action {
                strategy_name: "answer_product_question".to_string(),
                input: "wireless products".to_string(),
            }
        );
    }

    #[test]
    fn test_decorated_names_and_inputs() {
        let output = "Action: `get_product_price_and_stock`\nAction Input: \"Laptop Pro\"";
        assert_eq!(
            parse_router_output(output),
            RouterOutput::Action {
                strategy_name: "get_product_price_and_stock".to_string(),
                input: "Laptop Pro".to_string(),
            }
        );
    }

    #[test]
    fn test_unparseable_outputs() {
        assert!(matches!(
            parse_router_output("I am not sure what to do."),
            RouterOutput::Unparseable { .. }
        ));
        assert!(matches!(
            parse_router_output("Action: answer_product_question"),
            RouterOutput::Unparseable { .. }
        ));
        assert!(matches!(
            parse_router_output("Final Answer:   "),
            RouterOutput::Unparseable { .. }
        ));
    }

    #[test]
    fn test_truncate_at_observation() {
        assert_eq!(truncate_at_observation("a\nObservation: b"), "a");
        assert_eq!(truncate_at_observation("no marker"), "no marker");
    }
}
