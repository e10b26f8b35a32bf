//! Error types for Skydesk.

use thiserror::Error;

/// Library-level error type for Skydesk operations.
#[derive(Error, Debug)]
pub enum SkydeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Skydesk operations.
pub type Result<T> = std::result::Result<T, SkydeskError>;
