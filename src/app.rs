use newsgenie_core::{
    Config, GeminiAssistant, GeminiClient, NewsClient, Orchestrator, QueryRequest, RequestError,
    SearchClient, ServiceKeys, ToolBox, Transcript,
};
use std::sync::Arc;

/// Session state for the terminal front-end.
pub struct App {
    pub orchestrator: Orchestrator,
    pub transcript: Transcript,
    pub model: String,
    tools: ToolBox,
}

impl App {
    pub fn new(keys: &ServiceKeys, gemini_api_key: &str, config: &Config) -> Self {
        let news = Arc::new(NewsClient::new(&keys.gnews_api_key));
        let search = Arc::new(SearchClient::new(&keys.serper_api_key));
        let tools = ToolBox::new(news.clone(), search.clone());
        let model = config.model();

        let assistant = Arc::new(GeminiAssistant::new(
            GeminiClient::new(gemini_api_key, &model),
            tools.clone(),
        ));

        Self {
            orchestrator: Orchestrator::new(news, search, assistant),
            transcript: Transcript::new(),
            model,
            tools,
        }
    }

    /// Swap in a new Gemini key; news and search clients are kept.
    pub fn set_gemini_api_key(&mut self, key: &str) {
        let assistant = Arc::new(GeminiAssistant::new(
            GeminiClient::new(key, &self.model),
            self.tools.clone(),
        ));
        self.orchestrator = self.orchestrator.with_assistant(assistant);
    }

    /// Run one request and record the exchange. Rejected requests leave the
    /// transcript untouched.
    pub async fn submit(&mut self, request: &QueryRequest) -> Result<String, RequestError> {
        let response = self.orchestrator.handle(request).await?;
        self.transcript
            .push_exchange(request.normalized().transcript_label(), response.text.clone());
        Ok(response.text)
    }
}
