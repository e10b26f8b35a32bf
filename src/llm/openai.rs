//! OpenAI-compatible chat model client with sensible defaults.

use std::env;
use std::time::Duration;

use async_openai::types::CreateChatCompletionRequestArgs;
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use tracing::debug;

use super::{ChatModel, ChatReply, ChatRequest};
use crate::config::Settings;
use crate::error::{Result, SkydeskError};

/// Chat model backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModel {
    /// Create a client from settings, resolving the API key from the
    /// environment variable the settings name.
    ///
    /// Uses a configurable request timeout (5 minutes by default) to prevent
    /// hung API calls.
    pub fn new(settings: &Settings, model: &str) -> Result<Self> {
        let api_key = env::var(&settings.api.key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SkydeskError::Config(format!(
                    "{} is not set. Export it or add it to a .env file.",
                    settings.api.key_env
                ))
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.api.timeout_seconds))
            .build()
            .map_err(|e| SkydeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let config = OpenAIConfig::new()
            .with_api_base(settings.api.base_url.trim_end_matches('/'))
            .with_api_key(api_key);

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client),
            model: model.to_string(),
        })
    }

    /// Model name requests are issued with.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(request.messages);
        // Some compatible endpoints reject an empty tools array.
        if !request.tools.is_empty() {
            builder.tools(request.tools);
        }
        let body = builder
            .build()
            .map_err(|e| SkydeskError::Agent(e.to_string()))?;

        debug!("Sending chat completion request to {}", self.model);

        let response = self
            .client
            .chat()
            .create(body)
            .await
            .map_err(|e| SkydeskError::OpenAI(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SkydeskError::OpenAI("No response from model".to_string()))?;

        Ok(ChatReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls.unwrap_or_default(),
        })
    }
}
