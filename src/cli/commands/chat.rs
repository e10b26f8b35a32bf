//! Interactive customer service chat in the terminal.

use crate::agent::{RunItem, Runner, Session};
use crate::airline::{self, WELCOME_MESSAGE};
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::llm::OpenAiModel;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'skydesk doctor' for detailed diagnostics.");
        return Err(e);
    }

    let model = model.unwrap_or_else(|| settings.agent.model.clone());
    let client = Arc::new(OpenAiModel::new(&settings, &model)?);
    let team = airline::support_team(&settings.prompts)?;
    let runner = Runner::new(client, team).with_max_turns(settings.agent.max_turns);
    let mut session = Session::new(runner.team());

    println!("\n{}", style("Airline Customer Service").bold().cyan());
    println!(
        "{}\n",
        style("Type your request, or 'exit' to quit. Use 'clear' to start a new conversation.")
            .dim()
    );
    print_agent_line(session.current_agent(), WELCOME_MESSAGE);
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            // EOF
            println!();
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session = Session::new(runner.team());
            Output::info("Started a new conversation.");
            print_agent_line(session.current_agent(), WELCOME_MESSAGE);
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        match runner.run(&mut session, input).await {
            Ok(turn) => {
                spinner.finish_and_clear();
                println!();
                for item in &turn.items {
                    print_item(item);
                }
                println!();
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

/// Print one item of a completed turn.
fn print_item(item: &RunItem) {
    match item {
        RunItem::Message { agent, text } => print_agent_line(agent, text),
        RunItem::Handoff { from, to } => {
            println!(
                "{}",
                style(format!("Handed off from {} to {}", from, to)).magenta()
            );
        }
        RunItem::ToolCall { agent, .. } => {
            println!("{} {}", agent_label(agent), style("Calling a tool").dim());
        }
        RunItem::ToolOutput { agent, output } => {
            println!(
                "{} {}",
                agent_label(agent),
                style(format!("Tool call output: {}", output)).dim()
            );
        }
    }
}

fn print_agent_line(agent: &str, text: &str) {
    println!("{} {}", agent_label(agent), text);
}

fn agent_label(agent: &str) -> String {
    format!("{}", style(format!("{}:", agent)).cyan().bold())
}
