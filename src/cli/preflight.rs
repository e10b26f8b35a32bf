//! Pre-flight checks before commands that talk to the chat API.
//!
//! Validates required configuration up front so a conversation does not
//! fail on its first model call.

use crate::config::Settings;
use crate::error::{Result, SkydeskError};

/// Run pre-flight checks for commands that need the chat API.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(settings: &Settings) -> Result<()> {
    check_api_key(&settings.api.key_env)?;
    check_base_url(&settings.api.base_url)?;
    Ok(())
}

/// Check that the configured API key variable is set and non-empty.
fn check_api_key(key_env: &str) -> Result<()> {
    match std::env::var(key_env) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SkydeskError::Config(format!(
            "{} is empty. Set it with: export {}='sk-...'",
            key_env, key_env
        ))),
        Err(_) => Err(SkydeskError::Config(format!(
            "{} not set. Set it with: export {}='sk-...'",
            key_env, key_env
        ))),
    }
}

/// Check that the API base URL parses and uses http(s).
fn check_base_url(base_url: &str) -> Result<()> {
    let url = url::Url::parse(base_url)
        .map_err(|e| SkydeskError::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(SkydeskError::Config(format!(
            "API base URL must use http or https, got '{}'",
            base_url
        )));
    }
    Ok(())
}
