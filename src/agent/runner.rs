//! Conversation runner: drives one turn of the active agent.
//!
//! A turn is the span between one user input and the next. The runner calls
//! the chat model, executes any tool calls (including transfers between
//! agents) and loops until the model produces a plain message or the turn
//! budget runs out.

use std::sync::Arc;

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::context::CustomerContext;
use super::team::{Agent, Team};
use crate::error::{Result, SkydeskError};
use crate::llm::{ChatModel, ChatRequest};

/// Default cap on model calls within a single turn.
const DEFAULT_MAX_TURNS: usize = 10;

/// One item produced while running a turn, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunItem {
    /// An agent said something to the user.
    Message { agent: String, text: String },
    /// The conversation moved from one agent to another.
    Handoff { from: String, to: String },
    /// An agent invoked a domain tool.
    ToolCall {
        agent: String,
        tool: String,
        arguments: String,
    },
    /// Output a tool produced.
    ToolOutput { agent: String, output: String },
}

/// Everything one call to [`Runner::run`] produced.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Items in the order they happened.
    pub items: Vec<RunItem>,
    /// Text of the closing agent message; what a plain chat UI shows.
    pub final_output: String,
}

/// A single customer conversation: history, context and the active agent.
pub struct Session {
    id: String,
    current_agent: String,
    context: CustomerContext,
    history: Vec<ChatCompletionRequestMessage>,
}

impl Session {
    /// Start a fresh conversation with the team's entry agent.
    pub fn new(team: &Team) -> Self {
        let id = Uuid::new_v4().simple().to_string()[..16].to_string();
        Self {
            id,
            current_agent: team.entry().name.clone(),
            context: CustomerContext::default(),
            history: Vec::new(),
        }
    }

    /// Short conversation id, stable for the life of the session.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the agent that will handle the next input.
    pub fn current_agent(&self) -> &str {
        &self.current_agent
    }

    /// Conversation context accumulated so far.
    pub fn context(&self) -> &CustomerContext {
        &self.context
    }
}

/// Drives turns for a team of agents against a chat model.
pub struct Runner {
    model: Arc<dyn ChatModel>,
    team: Team,
    max_turns: usize,
}

impl Runner {
    /// Create a runner with the default turn budget.
    pub fn new(model: Arc<dyn ChatModel>, team: Team) -> Self {
        Self {
            model,
            team,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Cap the number of model calls a single turn may use.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// The team this runner drives.
    pub fn team(&self) -> &Team {
        &self.team
    }

    /// Run one turn: feed `user_input` to the session's current agent and
    /// work through tool calls and handoffs until an agent answers with a
    /// plain message.
    pub async fn run(&self, session: &mut Session, user_input: &str) -> Result<Turn> {
        session.history.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| SkydeskError::Agent(e.to_string()))?
                .into(),
        );

        let mut items = Vec::new();
        let mut calls = 0;

        loop {
            calls += 1;
            if calls > self.max_turns {
                return Err(SkydeskError::Agent(format!(
                    "Turn exceeded maximum model calls ({})",
                    self.max_turns
                )));
            }

            let agent = self.team.get(&session.current_agent).ok_or_else(|| {
                SkydeskError::Agent(format!("Unknown agent: {}", session.current_agent))
            })?;

            debug!("Agent '{}' iteration {} (session {})", agent.name, calls, session.id);

            let reply = self
                .model
                .complete(ChatRequest {
                    messages: with_instructions(agent, &session.history)?,
                    tools: agent.tool_definitions(&self.team),
                })
                .await?;

            // No tool calls means the agent is done with this turn.
            if reply.tool_calls.is_empty() {
                let text = reply.content.unwrap_or_default();
                session.history.push(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(text.clone())
                        .build()
                        .map_err(|e| SkydeskError::Agent(e.to_string()))?
                        .into(),
                );
                items.push(RunItem::Message {
                    agent: agent.name.clone(),
                    text: text.clone(),
                });
                return Ok(Turn {
                    items,
                    final_output: text,
                });
            }

            // Record the assistant message with its tool calls before
            // producing results for them.
            let mut assistant = ChatCompletionRequestAssistantMessageArgs::default();
            assistant.tool_calls(reply.tool_calls.clone());
            if let Some(ref content) = reply.content {
                assistant.content(content.clone());
            }
            session.history.push(
                assistant
                    .build()
                    .map_err(|e| SkydeskError::Agent(e.to_string()))?
                    .into(),
            );

            if let Some(content) = reply.content.filter(|text| !text.is_empty()) {
                items.push(RunItem::Message {
                    agent: agent.name.clone(),
                    text: content,
                });
            }

            let mut next_agent: Option<String> = None;
            for call in &reply.tool_calls {
                let result = if let Some(handoff) = agent.find_handoff(&call.function.name) {
                    if let Some(target) = &next_agent {
                        // One transfer per reply; refuse the rest.
                        format!("Already transferring to {}", target)
                    } else {
                        info!("Handoff from {} to {}", agent.name, handoff.target);
                        items.push(RunItem::Handoff {
                            from: agent.name.clone(),
                            to: handoff.target.clone(),
                        });
                        if let Some(hook) = handoff.on_handoff {
                            hook(&mut session.context);
                        }
                        let ack =
                            serde_json::json!({ "assistant": handoff.target }).to_string();
                        next_agent = Some(handoff.target.clone());
                        ack
                    }
                } else {
                    items.push(RunItem::ToolCall {
                        agent: agent.name.clone(),
                        tool: call.function.name.clone(),
                        arguments: call.function.arguments.clone(),
                    });
                    let output = execute_tool(agent, call, &mut session.context).await;
                    items.push(RunItem::ToolOutput {
                        agent: agent.name.clone(),
                        output: output.clone(),
                    });
                    output
                };

                session.history.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&call.id)
                        .content(result)
                        .build()
                        .map_err(|e| SkydeskError::Agent(e.to_string()))?
                        .into(),
                );
            }

            if let Some(next) = next_agent {
                session.current_agent = next;
            }
        }
    }
}

/// Parse and execute one domain tool call. Failures come back as output
/// text so the model can react to them.
async fn execute_tool(
    agent: &Agent,
    call: &ChatCompletionMessageToolCall,
    context: &mut CustomerContext,
) -> String {
    let name = &call.function.name;
    let arguments = &call.function.arguments;

    info!("{} calling tool: {} with args: {}", agent.name, name, arguments);

    let Some(spec) = agent.find_tool(name) else {
        return format!("Unknown tool: {}", name);
    };
    match spec.parse(arguments) {
        Ok(tool) => match tool.execute(context).await {
            Ok(output) => output,
            Err(e) => format!("Tool error: {}", e),
        },
        Err(e) => format!("Failed to parse tool call: {}", e),
    }
}

/// System message for the active agent followed by the shared history.
fn with_instructions(
    agent: &Agent,
    history: &[ChatCompletionRequestMessage],
) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(agent.instructions.clone())
            .build()
            .map_err(|e| SkydeskError::Agent(e.to_string()))?
            .into(),
    );
    messages.extend_from_slice(history);
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airline;
    use crate::config::AgentPrompts;
    use crate::llm::{ChatReply, MockModel};

    fn runner_with(replies: Vec<ChatReply>) -> (Runner, Arc<MockModel>) {
        let mock = Arc::new(MockModel::new(replies));
        let team = airline::support_team(&AgentPrompts::default()).unwrap();
        (Runner::new(mock.clone(), team), mock)
    }

    #[test]
    fn test_session_ids_are_short_and_unique() {
        let team = airline::support_team(&AgentPrompts::default()).unwrap();
        let a = Session::new(&team);
        let b = Session::new(&team);
        assert_eq!(a.id().len(), 16);
        assert!(a.id().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.current_agent(), airline::TRIAGE);
    }

    #[tokio::test]
    async fn test_plain_message_turn() {
        let (runner, mock) = runner_with(vec![ChatReply::message("Hello! How can I help?")]);
        let mut session = Session::new(runner.team());

        let turn = runner.run(&mut session, "hi").await.unwrap();

        assert_eq!(turn.final_output, "Hello! How can I help?");
        assert_eq!(turn.items.len(), 1);
        assert!(
            matches!(&turn.items[0], RunItem::Message { agent, .. } if agent == airline::TRIAGE)
        );
        assert_eq!(session.current_agent(), airline::TRIAGE);
        assert_eq!(session.history.len(), 2); // user + assistant

        // Triage advertises only its transfer tools.
        let request = &mock.requests()[0];
        let names: Vec<String> = request
            .tools
            .iter()
            .map(|tool| tool.function.name.clone())
            .collect();
        assert!(names.contains(&"transfer_to_faq_agent".to_string()));
        assert!(names.contains(&"transfer_to_seat_booking_agent".to_string()));
    }

    #[tokio::test]
    async fn test_handoff_runs_hook_and_switches_agent() {
        let (runner, mock) = runner_with(vec![
            ChatReply::tool_call("transfer_to_seat_booking_agent", serde_json::json!({})),
            ChatReply::tool_call(
                "update_seat",
                serde_json::json!({"confirmation_number": "LL0EZ6", "new_seat": "23A"}),
            ),
            ChatReply::message("Your seat is updated to 23A."),
        ]);
        let mut session = Session::new(runner.team());

        let turn = runner
            .run(&mut session, "I want to change my seat to 23A")
            .await
            .unwrap();

        assert_eq!(session.current_agent(), airline::SEAT_BOOKING);
        let flight = session.context().flight_number.clone().unwrap();
        assert!(flight.starts_with("FLT-"));
        assert_eq!(session.context().confirmation_number.as_deref(), Some("LL0EZ6"));
        assert_eq!(session.context().seat_number.as_deref(), Some("23A"));

        // Handoff, tool call, tool output, closing message, in order.
        assert!(matches!(
            &turn.items[0],
            RunItem::Handoff { from, to } if from == airline::TRIAGE && to == airline::SEAT_BOOKING
        ));
        assert!(matches!(
            &turn.items[1],
            RunItem::ToolCall { tool, .. } if tool == "update_seat"
        ));
        assert!(matches!(
            &turn.items[2],
            RunItem::ToolOutput { output, .. } if output.contains("Updated seat to 23A")
        ));
        assert!(matches!(
            &turn.items[3],
            RunItem::Message { text, .. } if text == "Your seat is updated to 23A."
        ));

        // The second request went out as the seat booking agent.
        let requests = mock.requests();
        let names: Vec<String> = requests[1]
            .tools
            .iter()
            .map(|tool| tool.function.name.clone())
            .collect();
        assert!(names.contains(&"update_seat".to_string()));
        assert!(names.contains(&"transfer_to_triage_agent".to_string()));
    }

    #[tokio::test]
    async fn test_faq_flow_answers_wifi() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call("transfer_to_faq_agent", serde_json::json!({})),
            ChatReply::tool_call(
                "faq_lookup_tool",
                serde_json::json!({"question": "does the plane have wifi?"}),
            ),
            ChatReply::message("We have free wifi on board, join Airline-Wifi."),
        ]);
        let mut session = Session::new(runner.team());

        let turn = runner.run(&mut session, "do you have wifi?").await.unwrap();

        let output = turn
            .items
            .iter()
            .find_map(|item| match item {
                RunItem::ToolOutput { output, .. } => Some(output.clone()),
                _ => None,
            })
            .unwrap();
        assert!(output.contains("Airline-Wifi"));
        assert_eq!(session.current_agent(), airline::FAQ);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_the_model() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call("cancel_flight", serde_json::json!({})),
            ChatReply::message("Sorry, I can't do that."),
        ]);
        let mut session = Session::new(runner.team());

        let turn = runner.run(&mut session, "cancel my flight").await.unwrap();

        assert!(turn.items.iter().any(|item| matches!(
            item,
            RunItem::ToolOutput { output, .. } if output.contains("Unknown tool: cancel_flight")
        )));
        assert_eq!(turn.final_output, "Sorry, I can't do that.");
    }

    #[tokio::test]
    async fn test_seat_update_without_flight_number_is_a_tool_error() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call(
                "update_seat",
                serde_json::json!({"confirmation_number": "X", "new_seat": "1A"}),
            ),
            ChatReply::message("Something went wrong updating your seat."),
        ]);
        let mut session = Session::new(runner.team());
        // Skip triage so no handoff hook assigned a flight number.
        session.current_agent = airline::SEAT_BOOKING.to_string();

        let turn = runner.run(&mut session, "move me to 1A").await.unwrap();

        assert!(turn.items.iter().any(|item| matches!(
            item,
            RunItem::ToolOutput { output, .. } if output.starts_with("Tool error:")
        )));
        assert_eq!(session.context().seat_number, None);
    }

    #[tokio::test]
    async fn test_second_handoff_in_one_reply_is_refused() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call("transfer_to_faq_agent", serde_json::json!({}))
                .and_tool_call("transfer_to_seat_booking_agent", serde_json::json!({})),
            ChatReply::message("What would you like to know?"),
        ]);
        let mut session = Session::new(runner.team());

        let turn = runner.run(&mut session, "hi").await.unwrap();

        assert_eq!(session.current_agent(), airline::FAQ);
        let handoffs = turn
            .items
            .iter()
            .filter(|item| matches!(item, RunItem::Handoff { .. }))
            .count();
        assert_eq!(handoffs, 1);
        // The refused seat booking transfer never ran its hook.
        assert_eq!(session.context().flight_number, None);
    }

    #[tokio::test]
    async fn test_turn_budget_is_enforced() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call("transfer_to_faq_agent", serde_json::json!({})),
            ChatReply::tool_call("transfer_to_triage_agent", serde_json::json!({})),
        ]);
        let runner = runner.with_max_turns(2);
        let mut session = Session::new(runner.team());

        let result = runner.run(&mut session, "hello").await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_history_accumulates_across_turns() {
        let (runner, mock) = runner_with(vec![
            ChatReply::message("Hello!"),
            ChatReply::message("Checked bags must be under 22.7 kg."),
        ]);
        let mut session = Session::new(runner.team());

        runner.run(&mut session, "hi").await.unwrap();
        runner
            .run(&mut session, "what's the baggage limit?")
            .await
            .unwrap();

        // The second request carried the system prompt plus both turns.
        let second = &mock.requests()[1];
        assert_eq!(second.messages.len(), 4); // system, user, assistant, user
        assert_eq!(session.history.len(), 4);
    }

    #[tokio::test]
    async fn test_content_alongside_tool_calls_is_surfaced() {
        let (runner, _mock) = runner_with(vec![
            ChatReply::tool_call("transfer_to_faq_agent", serde_json::json!({}))
                .with_content("Let me hand you over."),
            ChatReply::message("FAQ Agent here."),
        ]);
        let mut session = Session::new(runner.team());

        let turn = runner.run(&mut session, "question").await.unwrap();

        assert!(matches!(
            &turn.items[0],
            RunItem::Message { agent, text } if agent == airline::TRIAGE && text == "Let me hand you over."
        ));
        assert!(matches!(&turn.items[1], RunItem::Handoff { .. }));
    }
}
