pub mod ai;
pub mod category;
pub mod config;
pub mod error;
pub mod news;
pub mod orchestrator;
pub mod request;
pub mod router;
pub mod search;
pub mod state;

// Re-export main types for convenience
pub use ai::{Assistant, GeminiAssistant, GeminiClient, ToolBox};
pub use category::Category;
pub use config::{Config, ServiceKeys};
pub use error::{ConfigError, GeminiError, RequestError};
pub use news::{NewsClient, NewsOutcome, NewsSource};
pub use orchestrator::Orchestrator;
pub use request::{QueryRequest, Response};
pub use router::{Intent, Route};
pub use search::{SearchClient, SearchOutcome, WebSearch};
pub use state::{ChatMessage, ChatRole, Transcript};
