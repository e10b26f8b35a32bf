//! Agent system for multi-agent customer service with handoffs.
//!
//! Provides agent definitions, a validated team whose members can hand a
//! conversation off to one another, and the runner that drives one turn of
//! the active agent against a chat model.

mod context;
mod runner;
mod team;
mod tools;

pub use context::CustomerContext;
pub use runner::{RunItem, Runner, Session, Turn};
pub use team::{transfer_tool_name, Agent, Handoff, HandoffHook, Team};
pub use tools::{ToolCall, ToolSpec};
