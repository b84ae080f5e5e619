//! Pure routing decisions.
//!
//! Nothing here performs I/O; the orchestrator acts on what these functions
//! return.

use crate::request::QueryRequest;

/// Which handler a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    News,
    SearchOrAnswer,
    Empty,
}

/// How a free-text query is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Search,
    Answer,
}

/// Substrings that send a free-text query to web search.
pub const SEARCH_KEYWORDS: [&str; 9] = [
    "who", "what", "when", "where", "why", "how", "find", "show", "search",
];

pub fn decide(request: &QueryRequest) -> Route {
    if request.category.is_some() {
        Route::News
    } else if !request.text.trim().is_empty() {
        Route::SearchOrAnswer
    } else {
        Route::Empty
    }
}

/// Plain substring match, so "showcase" counts as "show".
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    if SEARCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Intent::Search
    } else {
        Intent::Answer
    }
}
