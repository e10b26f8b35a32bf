//! Agent instructions for the airline support team.
//!
//! The defaults below are the stock demo texts; any of them can be
//! overridden from the `[prompts]` section of the config file.

use serde::{Deserialize, Serialize};

/// Preamble composed into every agent's instructions. It explains the
/// multi-agent setup so each agent uses its transfer tools instead of
/// narrating handoffs to the customer.
pub const HANDOFF_PROMPT_PREFIX: &str = r#"# System context
You are part of a multi-agent customer support system. Each agent has its own
instructions and tools and can hand the conversation off to another agent when
appropriate. Handoffs happen through tool calls named `transfer_to_<agent_name>`.
Transfers are handled seamlessly in the background; do not mention or draw
attention to them in your conversation with the user."#;

/// Per-agent instruction texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub triage: String,
    pub faq: String,
    pub seat_booking: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            triage: "You are a helpful triaging agent. You can use your tools to \
                     delegate questions to other appropriate agents."
                .to_string(),

            faq: r#"You are an FAQ agent. If you are speaking to a customer, you probably were transferred to from the triage agent.
Use the following routine to support the customer.
# Routine
1. Identify the last question asked by the customer.
2. Use the faq lookup tool to answer the question. Do not rely on your own knowledge.
3. If you cannot answer the question, transfer back to the triage agent."#
                .to_string(),

            seat_booking: r#"You are a seat booking agent. If you are speaking to a customer, you probably were transferred to from the triage agent.
Use the following routine to support the customer.
# Routine
1. Ask for their confirmation number.
2. Ask the customer what their desired seat number is.
3. Use the update seat tool to update the seat on the flight.
If the customer asks a question that is not related to the routine, transfer back to the triage agent."#
                .to_string(),
        }
    }
}
