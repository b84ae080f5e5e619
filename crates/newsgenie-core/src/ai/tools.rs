//! Tools the assistant may call while composing an answer.

use crate::category::Category;
use crate::news::NewsSource;
use crate::search::WebSearch;
use serde_json::{json, Value};
use std::sync::Arc;

pub const GET_NEWS: &str = "get_news";
pub const SEARCH_THE_INTERNET: &str = "search_the_internet";

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Text handed back to the model for one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// Executes tool calls against the same clients the orchestrator uses.
#[derive(Clone)]
pub struct ToolBox {
    news: Arc<dyn NewsSource>,
    search: Arc<dyn WebSearch>,
}

impl ToolBox {
    pub fn new(news: Arc<dyn NewsSource>, search: Arc<dyn WebSearch>) -> Self {
        Self { news, search }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        let categories: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();

        vec![
            ToolDefinition {
                name: GET_NEWS.to_string(),
                description: "Fetch the latest news by category.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "News category",
                            "enum": categories,
                        }
                    },
                    "required": ["category"]
                }),
            },
            ToolDefinition {
                name: SEARCH_THE_INTERNET.to_string(),
                description: "Web search tool.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "argument": {
                            "type": "string",
                            "description": "What to search the web for"
                        }
                    },
                    "required": ["argument"]
                }),
            },
        ]
    }

    pub async fn call(&self, name: &str, args: &Value) -> ToolOutput {
        tracing::debug!(tool = name, %args, "assistant tool call");

        match name {
            GET_NEWS => {
                let Some(raw) = args.get("category").and_then(Value::as_str) else {
                    return ToolOutput::error("Missing required argument: category");
                };
                match Category::from_str(raw) {
                    Some(category) => ToolOutput::ok(self.news.fetch(category).await.render()),
                    None => ToolOutput::error(format!("Unknown news category: {}", raw)),
                }
            }
            SEARCH_THE_INTERNET => match args.get("argument").and_then(Value::as_str) {
                Some(query) => ToolOutput::ok(self.search.search(query).await.render()),
                None => ToolOutput::error("Missing required argument: argument"),
            },
            other => ToolOutput::error(format!("Unknown tool: {}", other)),
        }
    }
}
