//! Tool definitions and implementations for the customer service agents.

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

use super::context::CustomerContext;
use crate::error::{Result, SkydeskError};

/// Tools an agent can expose to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSpec {
    /// Answer frequently asked questions about the airline.
    FaqLookup,
    /// Change the seat on a booking.
    UpdateSeat,
}

impl ToolSpec {
    /// Tool name as advertised to the model.
    pub fn name(&self) -> &'static str {
        match self {
            ToolSpec::FaqLookup => "faq_lookup_tool",
            ToolSpec::UpdateSeat => "update_seat",
        }
    }

    /// OpenAI function/tool definition.
    pub fn definition(&self) -> ChatCompletionTool {
        match self {
            ToolSpec::FaqLookup => ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: self.name().to_string(),
                    description: Some("Lookup frequently asked questions.".to_string()),
                    parameters: Some(serde_json::json!({
                        "type": "object",
                        "properties": {
                            "question": {
                                "type": "string",
                                "description": "The customer's question"
                            }
                        },
                        "required": ["question"]
                    })),
                    strict: None,
                },
            },
            ToolSpec::UpdateSeat => ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: self.name().to_string(),
                    description: Some(
                        "Update the seat for a given confirmation number.".to_string(),
                    ),
                    parameters: Some(serde_json::json!({
                        "type": "object",
                        "properties": {
                            "confirmation_number": {
                                "type": "string",
                                "description": "The confirmation number for the flight"
                            },
                            "new_seat": {
                                "type": "string",
                                "description": "The new seat to update to"
                            }
                        },
                        "required": ["confirmation_number", "new_seat"]
                    })),
                    strict: None,
                },
            },
        }
    }

    /// Parse raw JSON argument text into an executable call.
    pub fn parse(&self, arguments: &str) -> Result<ToolCall> {
        let args: serde_json::Value = serde_json::from_str(arguments)
            .map_err(|e| SkydeskError::InvalidInput(format!("Invalid tool arguments: {}", e)))?;

        match self {
            ToolSpec::FaqLookup => {
                let question = args["question"]
                    .as_str()
                    .ok_or_else(|| {
                        SkydeskError::InvalidInput("Missing 'question' argument".to_string())
                    })?
                    .to_string();
                Ok(ToolCall::FaqLookup { question })
            }
            ToolSpec::UpdateSeat => {
                let confirmation_number = args["confirmation_number"]
                    .as_str()
                    .ok_or_else(|| {
                        SkydeskError::InvalidInput(
                            "Missing 'confirmation_number' argument".to_string(),
                        )
                    })?
                    .to_string();
                let new_seat = args["new_seat"]
                    .as_str()
                    .ok_or_else(|| {
                        SkydeskError::InvalidInput("Missing 'new_seat' argument".to_string())
                    })?
                    .to_string();
                Ok(ToolCall::UpdateSeat {
                    confirmation_number,
                    new_seat,
                })
            }
        }
    }
}

/// A parsed tool invocation, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    FaqLookup {
        question: String,
    },
    UpdateSeat {
        confirmation_number: String,
        new_seat: String,
    },
}

impl ToolCall {
    /// Execute the tool against the conversation context and return the
    /// result as a string.
    pub async fn execute(&self, context: &mut CustomerContext) -> Result<String> {
        match self {
            ToolCall::FaqLookup { question } => Ok(faq_answer(question)),
            ToolCall::UpdateSeat {
                confirmation_number,
                new_seat,
            } => update_seat(context, confirmation_number, new_seat),
        }
    }
}

/// Answer a frequently asked question by keyword matching over the
/// lowercased question.
fn faq_answer(question: &str) -> String {
    let question = question.to_lowercase();
    if question.contains("bag") || question.contains("baggage") {
        "You are allowed to bring one bag on the plane. \
         It must be under 22.7 kg (50 lbs) and within 56 cm x 36 cm x 23 cm."
            .to_string()
    } else if question.contains("seats") || question.contains("plane") {
        "There are 120 seats on the plane. There are 22 business class seats and \
         98 economy seats. Exit rows are rows 4 and 16. \
         Rows 5-8 are Economy Plus, with extra legroom."
            .to_string()
    } else if question.contains("wifi") {
        "We have free wifi on the plane, join Airline-Wifi".to_string()
    } else {
        "I'm sorry, I don't know the answer to that question.".to_string()
    }
}

/// Update the seat for a confirmation number. The conversation must already
/// have a flight number assigned; the triage handoff hook takes care of that.
fn update_seat(
    context: &mut CustomerContext,
    confirmation_number: &str,
    new_seat: &str,
) -> Result<String> {
    if context.flight_number.is_none() {
        return Err(SkydeskError::Tool(
            "Flight number is required before a seat update".to_string(),
        ));
    }
    context.confirmation_number = Some(confirmation_number.to_string());
    context.seat_number = Some(new_seat.to_string());
    Ok(format!(
        "Updated seat to {} for confirmation number {}",
        new_seat, confirmation_number
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faq_baggage_answer() {
        let answer = faq_answer("How many bags can I bring?");
        assert!(answer.contains("one bag"));
        assert!(answer.contains("22.7 kg"));

        // "baggage" hits the same branch.
        let answer = faq_answer("What is the baggage allowance?");
        assert!(answer.contains("one bag"));
    }

    #[test]
    fn test_faq_seats_answer() {
        let answer = faq_answer("How many seats are there?");
        assert!(answer.contains("120 seats"));
        assert!(answer.contains("22 business class"));

        let answer = faq_answer("Tell me about the plane");
        assert!(answer.contains("120 seats"));
    }

    #[test]
    fn test_faq_wifi_answer() {
        let answer = faq_answer("Does the flight have wifi?");
        assert_eq!(answer, "We have free wifi on the plane, join Airline-Wifi");

        // Matching is case-insensitive.
        let answer = faq_answer("WIFI?");
        assert!(answer.contains("Airline-Wifi"));
    }

    #[test]
    fn test_faq_unknown_question() {
        let answer = faq_answer("What movies are showing?");
        assert_eq!(answer, "I'm sorry, I don't know the answer to that question.");
    }

    #[test]
    fn test_parse_faq_lookup() {
        let tool = ToolSpec::FaqLookup
            .parse(r#"{"question": "do you have wifi?"}"#)
            .unwrap();
        assert_eq!(
            tool,
            ToolCall::FaqLookup {
                question: "do you have wifi?".to_string()
            }
        );
    }

    #[test]
    fn test_parse_update_seat() {
        let tool = ToolSpec::UpdateSeat
            .parse(r#"{"confirmation_number": "LL0EZ6", "new_seat": "23A"}"#)
            .unwrap();
        assert_eq!(
            tool,
            ToolCall::UpdateSeat {
                confirmation_number: "LL0EZ6".to_string(),
                new_seat: "23A".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_argument() {
        let result = ToolSpec::UpdateSeat.parse(r#"{"confirmation_number": "LL0EZ6"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = ToolSpec::FaqLookup.parse("not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_seat_writes_context() {
        let mut context = CustomerContext {
            flight_number: Some("FLT-123".to_string()),
            ..Default::default()
        };
        let tool = ToolCall::UpdateSeat {
            confirmation_number: "LL0EZ6".to_string(),
            new_seat: "23A".to_string(),
        };

        let output = tokio_test::block_on(tool.execute(&mut context)).unwrap();

        assert_eq!(output, "Updated seat to 23A for confirmation number LL0EZ6");
        assert_eq!(context.confirmation_number.as_deref(), Some("LL0EZ6"));
        assert_eq!(context.seat_number.as_deref(), Some("23A"));
    }

    #[test]
    fn test_update_seat_requires_flight_number() {
        let mut context = CustomerContext::default();
        let tool = ToolCall::UpdateSeat {
            confirmation_number: "LL0EZ6".to_string(),
            new_seat: "23A".to_string(),
        };

        let result = tokio_test::block_on(tool.execute(&mut context));

        assert!(result.is_err());
        assert_eq!(context.confirmation_number, None);
        assert_eq!(context.seat_number, None);
    }

    #[test]
    fn test_definitions_match_names() {
        for spec in [ToolSpec::FaqLookup, ToolSpec::UpdateSeat] {
            let definition = spec.definition();
            assert_eq!(definition.function.name, spec.name());
            assert!(definition.function.parameters.is_some());
        }
    }
}
