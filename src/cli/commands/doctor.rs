//! Doctor command - verify environment and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Skydesk Doctor");
    println!();
    println!("Checking environment and configuration...\n");

    let mut checks = Vec::new();

    // Check API configuration
    println!("{}", style("API Configuration").bold());
    let key_check = check_api_key(&settings.api.key_env);
    key_check.print();
    checks.push(key_check);
    let url_check = check_base_url(&settings.api.base_url);
    url_check.print();
    checks.push(url_check);

    println!();

    // Check agent configuration
    println!("{}", style("Agent Configuration").bold());
    let model_check = check_model(&settings.agent.model);
    model_check.print();
    checks.push(model_check);
    let turns_check = check_max_turns(settings.agent.max_turns);
    turns_check.print();
    checks.push(turns_check);

    println!();

    // Check configuration file
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Skydesk.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!(
            "All checks passed with {} warning(s).",
            warnings
        ));
    } else {
        Output::success("All checks passed! Skydesk is ready to use.");
    }

    Ok(())
}

/// Check if the configured API key variable is set.
fn check_api_key(key_env: &str) -> CheckResult {
    match std::env::var(key_env) {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok(key_env, &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            key_env,
            "empty",
            &format!("Set with: export {}='sk-...'", key_env),
        ),
        Ok(_) => CheckResult::warning(
            key_env,
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            key_env,
            "not set",
            &format!("Set with: export {}='sk-...'", key_env),
        ),
    }
}

/// Check that the API base URL parses.
fn check_base_url(base_url: &str) -> CheckResult {
    match url::Url::parse(base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            CheckResult::ok("Base URL", base_url)
        }
        Ok(url) => CheckResult::error(
            "Base URL",
            &format!("unsupported scheme '{}'", url.scheme()),
            "Use an http(s) URL, e.g. https://api.openai.com/v1",
        ),
        Err(e) => CheckResult::error(
            "Base URL",
            &format!("invalid: {}", e),
            "Fix [api] base_url with: skydesk config edit",
        ),
    }
}

/// Check that a chat model is configured.
fn check_model(model: &str) -> CheckResult {
    if model.is_empty() {
        CheckResult::error(
            "Model",
            "not set",
            "Fix [agent] model with: skydesk config edit",
        )
    } else {
        CheckResult::ok("Model", model)
    }
}

/// Check that agents have a usable turn budget.
fn check_max_turns(max_turns: usize) -> CheckResult {
    if max_turns == 0 {
        CheckResult::warning(
            "Turn budget",
            "0 - agents cannot answer",
            "Set [agent] max_turns to at least 1",
        )
    } else {
        CheckResult::ok(
            "Turn budget",
            &format!("{} model calls per message", max_turns),
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: skydesk config edit",
        )
    }
}
