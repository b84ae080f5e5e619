//! Google Gemini client and the tool-calling assistant built on it.

use super::tools::{ToolBox, ToolDefinition};
use super::{Assistant, SYSTEM_PROMPT};
use crate::error::GeminiError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const TEMPERATURE: f32 = 0.7;
pub const GEMINI_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_TOOL_ROUNDS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [Content],
    system_instruction: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDeclarations>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
        }
    }

    fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
        }
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::FunctionCall { function_call, .. } => Some(function_call),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
        #[serde(
            rename = "thoughtSignature",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        thought_signature: Option<String>,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

impl From<ToolDefinition> for FunctionDeclaration {
    fn from(def: ToolDefinition) -> Self {
        Self {
            name: def.name,
            description: def.description,
            parameters: def.parameters,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout: GEMINI_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// One `generateContent` call. Returns the first candidate's content,
    /// or `None` when the model returned no candidate.
    pub async fn generate(
        &self,
        contents: &[Content],
        tools: &[ToolDefinition],
    ) -> Result<Option<Content>, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let tools = if tools.is_empty() {
            Vec::new()
        } else {
            vec![ToolDeclarations {
                function_declarations: tools.iter().cloned().map(Into::into).collect(),
            }]
        };

        let request = GenerateRequest {
            contents,
            system_instruction: Content::system(SYSTEM_PROMPT),
            tools,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Decode(e.to_string()))?;

        Ok(parsed.candidates.into_iter().next().and_then(|c| c.content))
    }
}

/// Answers free text with Gemini, running `get_news` and
/// `search_the_internet` when the model asks for them.
pub struct GeminiAssistant {
    client: GeminiClient,
    tools: ToolBox,
}

impl GeminiAssistant {
    pub fn new(client: GeminiClient, tools: ToolBox) -> Self {
        Self { client, tools }
    }

    async fn converse(&self, text: &str) -> Result<Option<String>, GeminiError> {
        let definitions = ToolBox::definitions();
        let mut contents = vec![Content::user_text(text)];

        for round in 1..=MAX_TOOL_ROUNDS {
            let Some(reply) = self.client.generate(&contents, &definitions).await? else {
                tracing::debug!(round, "gemini returned no candidates");
                return Ok(None);
            };

            let calls: Vec<FunctionCall> = reply.function_calls().into_iter().cloned().collect();
            if calls.is_empty() {
                let text = reply.text();
                tracing::debug!(round, chars = text.len(), "gemini answered");
                return Ok(if text.trim().is_empty() { None } else { Some(text) });
            }

            tracing::debug!(round, calls = calls.len(), "gemini requested tools");
            let mut responses = Vec::with_capacity(calls.len());
            for call in &calls {
                let output = self.tools.call(&call.name, &call.args).await;
                responses.push(Part::FunctionResponse {
                    function_response: FunctionResponse {
                        name: call.name.clone(),
                        response: json!({
                            "result": output.content,
                            "error": output.is_error,
                        }),
                    },
                });
            }

            contents.push(Content {
                role: Some("model".to_string()),
                ..reply
            });
            contents.push(Content {
                role: Some("user".to_string()),
                parts: responses,
            });
        }

        Err(GeminiError::TooManyToolRounds(MAX_TOOL_ROUNDS))
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn answer(&self, text: &str) -> Result<Option<String>> {
        Ok(self.converse(text).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::news::{NewsArticle, NewsOutcome, NewsSource};
    use crate::search::{SearchOutcome, WebSearch};
    use httpmock::prelude::*;
    use std::sync::Arc;

    struct NoNews;

    #[async_trait]
    impl NewsSource for NoNews {
        async fn fetch(&self, _category: Category) -> NewsOutcome {
            NewsOutcome::NotFound
        }
    }

    struct OneHeadline;

    #[async_trait]
    impl NewsSource for OneHeadline {
        async fn fetch(&self, _category: Category) -> NewsOutcome {
            NewsOutcome::Articles(vec![NewsArticle {
                title: "Markets rally".to_string(),
                url: "https://news.example/markets".to_string(),
            }])
        }
    }

    struct NoSearch;

    #[async_trait]
    impl WebSearch for NoSearch {
        async fn search(&self, _query: &str) -> SearchOutcome {
            SearchOutcome::MissingResults
        }
    }

    fn assistant(base_url: &str) -> GeminiAssistant {
        let client = GeminiClient::new("gemini-key", DEFAULT_MODEL).with_base_url(base_url);
        GeminiAssistant::new(client, ToolBox::new(Arc::new(NoNews), Arc::new(NoSearch)))
    }

    #[test]
    fn test_request_serialization() {
        let contents = vec![Content::user_text("hello")];
        let request = GenerateRequest {
            contents: &contents,
            system_instruction: Content::system(SYSTEM_PROMPT),
            tools: vec![ToolDeclarations {
                function_declarations: ToolBox::definitions().into_iter().map(Into::into).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert!(value["systemInstruction"].get("role").is_none());
        assert!(value["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are NewsGenie"));
        assert_eq!(value["tools"][0]["functionDeclarations"][0]["name"], "get_news");
        assert_eq!(
            value["tools"][0]["functionDeclarations"][1]["name"],
            "search_the_internet"
        );
        let temperature = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parse_function_call_part() {
        let content: Content = serde_json::from_value(json!({
            "role": "model",
            "parts": [
                { "functionCall": { "name": "get_news", "args": { "category": "world" } },
                  "thoughtSignature": "abc" }
            ]
        }))
        .unwrap();

        let calls = content.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_news");
        assert_eq!(calls[0].args["category"], "world");
        assert_eq!(content.text(), "");
    }

    #[test]
    fn test_parse_unknown_part_kind() {
        let content: Content = serde_json::from_value(json!({
            "role": "model",
            "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "" } },
                { "text": "caption" }
            ]
        }))
        .unwrap();
        assert_eq!(content.text(), "caption");
        assert!(content.function_calls().is_empty());
    }

    #[tokio::test]
    async fn test_answer_returns_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-2.5-flash:generateContent")
                    .query_param("key", "gemini-key");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": { "role": "model", "parts": [
                            { "text": "Why did the crab " },
                            { "text": "never share? Because it's shellfish." }
                        ]},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 12 }
                }));
            })
            .await;

        let answer = assistant(&server.base_url()).answer("tell me a joke").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            answer.as_deref(),
            Some("Why did the crab never share? Because it's shellfish.")
        );
    }

    #[tokio::test]
    async fn test_answer_without_candidates_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-2.5-flash:generateContent");
                then.status(200).json_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
            })
            .await;

        let answer = assistant(&server.base_url()).answer("hmm").await.unwrap();
        assert_eq!(answer, None);
    }

    #[tokio::test]
    async fn test_answer_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-2.5-flash:generateContent");
                then.status(400).json_body(json!({
                    "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
                }));
            })
            .await;

        let err = assistant(&server.base_url()).answer("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "Gemini API error 400: API key not valid.");
    }

    #[tokio::test]
    async fn test_answer_gives_up_after_max_tool_rounds() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/models/gemini-2.5-flash:generateContent");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": { "role": "model", "parts": [
                            { "functionCall": { "name": "search_the_internet", "args": { "argument": "rust" } } }
                        ]}
                    }]
                }));
            })
            .await;

        let err = assistant(&server.base_url()).answer("loop forever").await.unwrap_err();
        assert!(err.to_string().contains("after 5 rounds"));
    }

    #[tokio::test]
    async fn test_answer_runs_tool_and_sends_result_back() {
        let server = MockServer::start_async().await;
        let tool_request = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-2.5-flash:generateContent")
                    .body_excludes("functionResponse");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": { "role": "model", "parts": [
                            { "functionCall": { "name": "get_news", "args": { "category": "business" } },
                              "thoughtSignature": "sig-1" }
                        ]}
                    }]
                }));
            })
            .await;
        let final_answer = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/gemini-2.5-flash:generateContent")
                    .body_includes("functionResponse")
                    .body_includes("\"thoughtSignature\":\"sig-1\"")
                    .body_includes("Markets rally")
                    .body_includes("https://news.example/markets");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": { "role": "model", "parts": [{ "text": "Here is the news." }] }
                    }]
                }));
            })
            .await;

        let client = GeminiClient::new("gemini-key", DEFAULT_MODEL).with_base_url(&server.base_url());
        let assistant =
            GeminiAssistant::new(client, ToolBox::new(Arc::new(OneHeadline), Arc::new(NoSearch)));
        let answer = assistant.answer("what is happening in business?").await.unwrap();

        tool_request.assert_async().await;
        final_answer.assert_async().await;
        assert_eq!(answer.as_deref(), Some("Here is the news."));
    }
}
