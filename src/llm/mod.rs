//! Chat model abstraction.
//!
//! The agent runner drives a [`ChatModel`] rather than a concrete client so
//! that conversation flows can be exercised against scripted replies in
//! tests. [`OpenAiModel`] talks to any OpenAI-compatible endpoint.

mod mock;
mod openai;

pub use mock::MockModel;
pub use openai::OpenAiModel;

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestMessage, ChatCompletionTool,
    ChatCompletionToolType, FunctionCall,
};
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// One chat-completion request: the full message history plus the tool
/// definitions the active agent exposes.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatCompletionRequestMessage>,
    pub tools: Vec<ChatCompletionTool>,
}

/// The distilled reply from a single model call.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    /// Assistant text, if the model produced any.
    pub content: Option<String>,
    /// Tool calls the model wants executed, in order. Empty means the
    /// assistant message is final.
    pub tool_calls: Vec<ChatCompletionMessageToolCall>,
}

impl ChatReply {
    /// A plain assistant message with no tool calls.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A reply consisting of a single tool call.
    pub fn tool_call(name: &str, arguments: serde_json::Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![make_tool_call(name, arguments)],
        }
    }

    /// Append another tool call to this reply.
    pub fn and_tool_call(mut self, name: &str, arguments: serde_json::Value) -> Self {
        self.tool_calls.push(make_tool_call(name, arguments));
        self
    }

    /// Attach assistant text alongside any tool calls.
    pub fn with_content(mut self, text: impl Into<String>) -> Self {
        self.content = Some(text.into());
        self
    }
}

/// Build a tool call shaped like the ones the API returns.
fn make_tool_call(name: &str, arguments: serde_json::Value) -> ChatCompletionMessageToolCall {
    ChatCompletionMessageToolCall {
        id: format!("call_{}", Uuid::new_v4().simple()),
        r#type: ChatCompletionToolType::Function,
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }
}

/// Chat-completions client the agent runner drives.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one chat completion and distill the first choice.
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply>;
}
