//! Ask command implementation.

use crate::agent::{Runner, Session};
use crate::airline;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::llm::OpenAiModel;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command: send one message and print the team's final answer.
pub async fn run_ask(message: &str, model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'skydesk doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let client = Arc::new(OpenAiModel::new(&settings, &model)?);
    let team = airline::support_team(&settings.prompts)?;
    let runner = Runner::new(client, team).with_max_turns(settings.agent.max_turns);
    let mut session = Session::new(runner.team());

    let spinner = Output::spinner("Thinking...");

    match runner.run(&mut session, message).await {
        Ok(turn) => {
            spinner.finish_and_clear();
            println!("\n{}\n", turn.final_output);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to get an answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
