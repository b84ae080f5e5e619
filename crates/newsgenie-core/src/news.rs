use crate::category::Category;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GNEWS_BASE_URL: &str = "https://gnews.io";
pub const MAX_ARTICLES: usize = 5;
pub const NEWS_TIMEOUT: Duration = Duration::from_secs(10);

pub const NO_ARTICLES_TEXT: &str = "No news articles found for this category.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

/// Why a headlines request produced no articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// Connection, timeout or decoding failure.
    Transport(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Status { body, .. } => write!(f, "Unable to fetch news: {}", body),
            FetchFailure::Transport(message) => write!(f, "Error fetching news: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsOutcome {
    Articles(Vec<NewsArticle>),
    NotFound,
    UpstreamError(FetchFailure),
}

impl NewsOutcome {
    /// Text form of the outcome: one `title\nurl` paragraph per article, or
    /// a message describing why there are none.
    pub fn render(&self) -> String {
        match self {
            NewsOutcome::Articles(articles) => articles
                .iter()
                .map(|a| format!("{}\n{}", a.title, a.url))
                .collect::<Vec<_>>()
                .join("\n\n"),
            NewsOutcome::NotFound => NO_ARTICLES_TEXT.to_string(),
            NewsOutcome::UpstreamError(failure) => failure.to_string(),
        }
    }
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Never fails; problems come back as `NewsOutcome::UpstreamError`.
    async fn fetch(&self, category: Category) -> NewsOutcome;
}

/// Client for the GNews top-headlines endpoint.
#[derive(Clone)]
pub struct NewsClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl NewsClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: GNEWS_BASE_URL.to_string(),
            timeout: NEWS_TIMEOUT,
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

    async fn top_headlines(&self, category: Category) -> Result<NewsOutcome> {
        let url = format!("{}/api/v4/top-headlines", self.base_url);
        let max = MAX_ARTICLES.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("category", category.as_str()),
                ("lang", "en"),
                ("max", max.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Ok(NewsOutcome::UpstreamError(FetchFailure::Status { status, body }));
        }

        let headlines: HeadlinesResponse = response.json().await?;
        if headlines.articles.is_empty() {
            return Ok(NewsOutcome::NotFound);
        }

        let mut articles = headlines.articles;
        articles.truncate(MAX_ARTICLES);
        Ok(NewsOutcome::Articles(articles))
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn fetch(&self, category: Category) -> NewsOutcome {
        let outcome = match self.top_headlines(category).await {
            Ok(outcome) => outcome,
            Err(e) => NewsOutcome::UpstreamError(FetchFailure::Transport(e.to_string())),
        };

        match &outcome {
            NewsOutcome::Articles(articles) => {
                tracing::debug!(%category, count = articles.len(), "fetched headlines");
            }
            NewsOutcome::NotFound => tracing::debug!(%category, "no headlines"),
            NewsOutcome::UpstreamError(failure) => {
                tracing::warn!(%category, error = %failure, "headlines request failed");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn articles_json(count: usize) -> serde_json::Value {
        let articles: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "title": format!("Title {}", i),
                    "url": format!("https://example.com/{}", i),
                    "description": "ignored",
                })
            })
            .collect();
        json!({ "totalArticles": count, "articles": articles })
    }

    #[tokio::test]
    async fn test_fetch_sends_expected_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v4/top-headlines")
                    .query_param("category", "technology")
                    .query_param("lang", "en")
                    .query_param("max", "5")
                    .query_param("token", "gnews-key");
                then.status(200).json_body(json!({
                    "articles": [
                        { "title": "A", "url": "u1" },
                        { "title": "B", "url": "u2" }
                    ]
                }));
            })
            .await;

        let client = NewsClient::new("gnews-key").with_base_url(&server.base_url());
        let outcome = client.fetch(Category::Technology).await;

        mock.assert_async().await;
        assert_eq!(outcome.render(), "A\nu1\n\nB\nu2");
    }

    #[tokio::test]
    async fn test_fetch_caps_articles_at_five() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(200).json_body(articles_json(8));
            })
            .await;

        let client = NewsClient::new("k").with_base_url(&server.base_url());
        match client.fetch(Category::World).await {
            NewsOutcome::Articles(articles) => {
                assert_eq!(articles.len(), MAX_ARTICLES);
                assert_eq!(articles[0].title, "Title 0");
                assert_eq!(articles[4].title, "Title 4");
            }
            other => panic!("expected articles, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_keeps_upstream_order_and_count() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(200).json_body(articles_json(3));
            })
            .await;

        let client = NewsClient::new("k").with_base_url(&server.base_url());
        let text = client.fetch(Category::Science).await.render();
        assert_eq!(
            text,
            "Title 0\nhttps://example.com/0\n\nTitle 1\nhttps://example.com/1\n\nTitle 2\nhttps://example.com/2"
        );
    }

    #[tokio::test]
    async fn test_fetch_no_articles() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(200).json_body(json!({ "totalArticles": 0, "articles": [] }));
            })
            .await;

        let client = NewsClient::new("k").with_base_url(&server.base_url());
        let outcome = client.fetch(Category::Politics).await;
        assert_eq!(outcome, NewsOutcome::NotFound);
        assert_eq!(outcome.render(), NO_ARTICLES_TEXT);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(403).body("{\"errors\":[\"invalid token\"]}");
            })
            .await;

        let client = NewsClient::new("bad").with_base_url(&server.base_url());
        let outcome = client.fetch(Category::Business).await;
        assert_eq!(
            outcome,
            NewsOutcome::UpstreamError(FetchFailure::Status {
                status: 403,
                body: "{\"errors\":[\"invalid token\"]}".to_string(),
            })
        );
        assert!(outcome.render().starts_with("Unable to fetch news:"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_transport_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(200).body("not json");
            })
            .await;

        let client = NewsClient::new("k").with_base_url(&server.base_url());
        let outcome = client.fetch(Category::Health).await;
        assert!(matches!(outcome, NewsOutcome::UpstreamError(FetchFailure::Transport(_))));
        assert!(outcome.render().starts_with("Error fetching news:"));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v4/top-headlines");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(articles_json(1));
            })
            .await;

        let client = NewsClient::new("k")
            .with_base_url(&server.base_url())
            .with_timeout(Duration::from_millis(50));
        let outcome = client.fetch(Category::Sports).await;
        assert!(matches!(outcome, NewsOutcome::UpstreamError(FetchFailure::Transport(_))));
    }
}
