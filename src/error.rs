//! Error types for Postbot.

use thiserror::Error;

/// Library-level error type for Postbot operations.
#[derive(Error, Debug)]
pub enum PostbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generative model error: {0}")]
    Model(String),

    #[error("Tool call error: {0}")]
    ToolCall(String),
}

/// Result type alias for Postbot operations.
pub type Result<T> = std::result::Result<T, PostbotError>;
