//! Skydesk - Airline Customer Service Agents
//!
//! A multi-agent customer service assistant for the terminal and the browser.
//! A triage agent routes each request to an FAQ or seat booking specialist,
//! and specialists hand the conversation back when a request is out of scope.
//!
//! # Overview
//!
//! Skydesk allows you to:
//! - Chat with the support team interactively in the terminal
//! - Send a single message and get the team's final answer
//! - Serve a browser chat widget with per-session conversation state
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and agent prompts
//! - `llm` - Chat model abstraction (OpenAI-compatible client, scripted mock)
//! - `agent` - Agent and team definitions, tools, and the turn runner
//! - `airline` - The airline customer service team
//! - `cli` - Command-line interface and the web chat server
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use skydesk::agent::{Runner, Session};
//! use skydesk::airline;
//! use skydesk::config::Settings;
//! use skydesk::llm::OpenAiModel;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let model = Arc::new(OpenAiModel::new(&settings, &settings.agent.model)?);
//!     let team = airline::support_team(&settings.prompts)?;
//!     let runner = Runner::new(model, team);
//!
//!     let mut session = Session::new(runner.team());
//!     let turn = runner.run(&mut session, "How many seats are on the plane?").await?;
//!     println!("{}", turn.final_output);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod airline;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;

pub use error::{Result, SkydeskError};
