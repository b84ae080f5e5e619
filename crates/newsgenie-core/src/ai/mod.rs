pub mod gemini;
pub mod tools;

pub use gemini::{GeminiAssistant, GeminiClient, DEFAULT_MODEL};
pub use tools::{ToolBox, ToolDefinition, ToolOutput};

use anyhow::Result;
use async_trait::async_trait;

pub const SYSTEM_PROMPT: &str = "You are NewsGenie, a smart AI assistant. \
Use the news tool to fetch latest news (by category). \
Use the search tool for web information. Answer normally otherwise.";

/// A language model that answers free text directly.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// `Ok(None)` when the model produced no text.
    async fn answer(&self, text: &str) -> Result<Option<String>>;
}
