//! One request in, one response out.

use crate::ai::Assistant;
use crate::error::RequestError;
use crate::news::{NewsOutcome, NewsSource};
use crate::request::{QueryRequest, Response};
use crate::router::{self, Intent, Route};
use crate::search::{SearchOutcome, WebSearch};
use std::sync::Arc;

pub const NEWS_FALLBACK_TEXT: &str = "No news found or API error.";
pub const NO_RESPONSE_TEXT: &str = "No response generated.";
pub const SEARCH_UNAVAILABLE_TEXT: &str = "Web search is unavailable right now.";

/// Routes requests to the news, search or assistant handler.
///
/// Holds no per-request state; the same instance serves every request of a
/// session.
#[derive(Clone)]
pub struct Orchestrator {
    news: Arc<dyn NewsSource>,
    search: Arc<dyn WebSearch>,
    assistant: Arc<dyn Assistant>,
}

impl Orchestrator {
    pub fn new(
        news: Arc<dyn NewsSource>,
        search: Arc<dyn WebSearch>,
        assistant: Arc<dyn Assistant>,
    ) -> Self {
        Self {
            news,
            search,
            assistant,
        }
    }

    pub fn with_assistant(&self, assistant: Arc<dyn Assistant>) -> Self {
        Self {
            news: self.news.clone(),
            search: self.search.clone(),
            assistant,
        }
    }

    /// Only fails for empty input; every handler problem becomes response
    /// text.
    pub async fn handle(&self, request: &QueryRequest) -> Result<Response, RequestError> {
        if request.is_empty() {
            return Err(RequestError::EmptyInput);
        }

        if request.category.is_some() && !request.text.trim().is_empty() {
            tracing::debug!("category selected, ignoring free text");
        }
        let request = request.normalized();

        let route = router::decide(&request);
        tracing::debug!(?route, "routing request");

        let text = match (route, request.category) {
            (Route::News, Some(category)) => match self.news.fetch(category).await {
                outcome @ NewsOutcome::Articles(_) => outcome.render(),
                NewsOutcome::NotFound | NewsOutcome::UpstreamError(_) => {
                    NEWS_FALLBACK_TEXT.to_string()
                }
            },
            (Route::SearchOrAnswer, _) => self.search_or_answer(&request.text).await,
            _ => return Err(RequestError::EmptyInput),
        };

        Ok(Response::new(text))
    }

    async fn search_or_answer(&self, text: &str) -> String {
        match router::classify(text) {
            Intent::Search => match self.search.search(text).await {
                SearchOutcome::Unavailable(_) => SEARCH_UNAVAILABLE_TEXT.to_string(),
                outcome => outcome.render(),
            },
            Intent::Answer => match self.assistant.answer(text).await {
                Ok(Some(answer)) => answer,
                Ok(None) => NO_RESPONSE_TEXT.to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "assistant failed");
                    format!("Error processing your request: {}", e)
                }
            },
        }
    }
}
