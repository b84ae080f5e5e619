//! Error types surfaced by the core library.

use thiserror::Error;

/// A request the orchestrator refuses to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Please enter a question or select a news category.")]
    EmptyInput,
    #[error("Unknown news category: {0}")]
    UnknownCategory(String),
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Service temporarily unavailable. Missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures talking to the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Invalid Gemini response: {0}")]
    Decode(String),
    #[error("Gemini kept calling tools after {0} rounds")]
    TooManyToolRounds(usize),
}
