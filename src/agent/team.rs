//! Agent definitions and team wiring.

use std::collections::HashSet;

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

use super::context::CustomerContext;
use super::tools::ToolSpec;
use crate::error::{Result, SkydeskError};

/// Hook run on the conversation context when a handoff is taken.
pub type HandoffHook = fn(&mut CustomerContext);

/// A single agent: instructions plus the tools and handoffs it exposes.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Display name, e.g. "Triage Agent". Also the key other agents use to
    /// hand off to it.
    pub name: String,
    /// One-line description shown to other agents on the transfer tool.
    pub handoff_description: String,
    /// System prompt for this agent's model calls.
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
    pub handoffs: Vec<Handoff>,
}

impl Agent {
    /// Create an agent with no tools or handoffs.
    pub fn new(name: &str, handoff_description: &str, instructions: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            handoff_description: handoff_description.to_string(),
            instructions: instructions.into(),
            tools: Vec::new(),
            handoffs: Vec::new(),
        }
    }

    /// Set the domain tools this agent exposes.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the agents this agent can hand off to.
    pub fn with_handoffs(mut self, handoffs: Vec<Handoff>) -> Self {
        self.handoffs = handoffs;
        self
    }

    /// Look up a domain tool by its advertised name.
    pub fn find_tool(&self, name: &str) -> Option<ToolSpec> {
        self.tools.iter().copied().find(|tool| tool.name() == name)
    }

    /// Look up a handoff by its transfer tool name.
    pub fn find_handoff(&self, tool_name: &str) -> Option<&Handoff> {
        self.handoffs
            .iter()
            .find(|handoff| handoff.tool_name() == tool_name)
    }

    /// Tool definitions sent to the model for this agent: domain tools
    /// followed by one transfer tool per handoff.
    pub fn tool_definitions(&self, team: &Team) -> Vec<ChatCompletionTool> {
        let mut definitions: Vec<ChatCompletionTool> =
            self.tools.iter().map(ToolSpec::definition).collect();
        for handoff in &self.handoffs {
            let description = team
                .get(&handoff.target)
                .map(|agent| agent.handoff_description.clone())
                .unwrap_or_default();
            definitions.push(handoff.definition(&description));
        }
        definitions
    }
}

/// A permitted handoff to another agent, optionally running a hook on the
/// conversation context when taken.
#[derive(Debug, Clone)]
pub struct Handoff {
    pub target: String,
    pub on_handoff: Option<HandoffHook>,
}

impl Handoff {
    /// Handoff to the named agent.
    pub fn to(target: &str) -> Self {
        Self {
            target: target.to_string(),
            on_handoff: None,
        }
    }

    /// Run `hook` on the context when this handoff is taken.
    pub fn with_hook(mut self, hook: HandoffHook) -> Self {
        self.on_handoff = Some(hook);
        self
    }

    /// Name of the transfer tool advertised for this handoff.
    pub fn tool_name(&self) -> String {
        transfer_tool_name(&self.target)
    }

    fn definition(&self, target_description: &str) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: self.tool_name(),
                description: Some(format!(
                    "Handoff to the {} agent to handle the request. {}",
                    self.target, target_description
                )),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {}
                })),
                strict: None,
            },
        }
    }
}

/// Transfer tool name for an agent: `transfer_to_` plus the lowercased name
/// with each non-alphanumeric character replaced by an underscore.
pub fn transfer_tool_name(agent_name: &str) -> String {
    let slug: String = agent_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("transfer_to_{}", slug)
}

/// A validated set of agents with a designated entry point.
#[derive(Debug, Clone)]
pub struct Team {
    agents: Vec<Agent>,
    entry: usize,
}

impl Team {
    /// Build a team, checking that agent names are unique, every handoff
    /// target exists, and the entry agent is present.
    pub fn new(agents: Vec<Agent>, entry: &str) -> Result<Self> {
        let mut names = HashSet::new();
        for agent in &agents {
            if !names.insert(agent.name.clone()) {
                return Err(SkydeskError::Agent(format!(
                    "Duplicate agent name: {}",
                    agent.name
                )));
            }
        }
        for agent in &agents {
            for handoff in &agent.handoffs {
                if !names.contains(&handoff.target) {
                    return Err(SkydeskError::Agent(format!(
                        "Agent '{}' hands off to unknown agent '{}'",
                        agent.name, handoff.target
                    )));
                }
            }
        }
        let entry = agents
            .iter()
            .position(|agent| agent.name == entry)
            .ok_or_else(|| SkydeskError::Agent(format!("Unknown entry agent: {}", entry)))?;

        Ok(Self { agents, entry })
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    /// The agent new conversations start with.
    pub fn entry(&self) -> &Agent {
        &self.agents[self.entry]
    }

    /// Agent names in registration order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|agent| agent.name.as_str()).collect()
    }
}
