//! Configuration module for Skydesk.
//!
//! Handles loading and managing application settings and agent prompts.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, HANDOFF_PROMPT_PREFIX};
pub use settings::{AgentSettings, ApiSettings, ServerSettings, Settings};
