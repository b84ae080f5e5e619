use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SERPER_BASE_URL: &str = "https://google.serper.dev";
pub const MAX_RESULTS: usize = 4;
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const MISSING_RESULTS_TEXT: &str = "Apologies, I couldn't locate any results for that query. \
The problem might be with your Serper API key.";
pub const NO_RESULTS_TEXT: &str = "No search results found.";

const RESULT_SEPARATOR: &str = "-----------------";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

impl SearchResult {
    fn render(&self) -> String {
        format!(
            "Title: {}\nLink: {}\nSnippet: {}\n\n{}",
            self.title, self.link, self.snippet, RESULT_SEPARATOR
        )
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    organic: Option<Vec<OrganicEntry>>,
}

#[derive(Deserialize)]
struct OrganicEntry {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl OrganicEntry {
    fn complete(self) -> Option<SearchResult> {
        Some(SearchResult {
            title: self.title?,
            link: self.link?,
            snippet: self.snippet?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Results(Vec<SearchResult>),
    /// The response had no `organic` field, usually a bad API key.
    MissingResults,
    Unavailable(String),
}

impl SearchOutcome {
    pub fn render(&self) -> String {
        match self {
            SearchOutcome::Results(results) if results.is_empty() => NO_RESULTS_TEXT.to_string(),
            SearchOutcome::Results(results) => results
                .iter()
                .map(SearchResult::render)
                .collect::<Vec<_>>()
                .join("\n"),
            SearchOutcome::MissingResults => MISSING_RESULTS_TEXT.to_string(),
            SearchOutcome::Unavailable(message) => format!("Web search failed: {}", message),
        }
    }
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> SearchOutcome;
}

/// Client for the Serper search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl SearchClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: SERPER_BASE_URL.to_string(),
            timeout: SEARCH_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn organic_results(&self, query: &str) -> Result<SearchOutcome> {
        let url = format!("{}/search", self.base_url);

        // The status is not checked: error payloads lack `organic` and are
        // reported as `MissingResults`.
        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&SearchRequest { q: query })
            .timeout(self.timeout)
            .send()
            .await?;

        let search_response: SearchResponse = response.json().await?;
        let Some(organic) = search_response.organic else {
            return Ok(SearchOutcome::MissingResults);
        };

        let results = organic
            .into_iter()
            .take(MAX_RESULTS)
            .filter_map(OrganicEntry::complete)
            .collect();
        Ok(SearchOutcome::Results(results))
    }
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(&self, query: &str) -> SearchOutcome {
        match self.organic_results(query).await {
            Ok(outcome) => {
                if let SearchOutcome::Results(results) = &outcome {
                    tracing::debug!(count = results.len(), "web search completed");
                } else {
                    tracing::warn!("web search response had no organic results");
                }
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "web search request failed");
                SearchOutcome::Unavailable(e.to_string())
            }
        }
    }
}
