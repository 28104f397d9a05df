//! Application state management

use laz_core::config::AppConfig;
use laz_core::{CompletionClient, Result, WikiSource};
use laz_rag::{Assistant, OpenAiClient, WikiRagOrchestrator};
use laz_wiki::WikipediaClient;
use std::sync::Arc;

/// Application state shared across handlers
///
/// Built once at startup and read-only afterwards.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Chat, summarize and sentiment
    pub assistant: Assistant,
    /// Wikipedia lookup and enriched answers
    pub rag: WikiRagOrchestrator,
}

impl AppState {
    /// Create state around the given collaborators
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn CompletionClient>,
        wiki: Arc<dyn WikiSource>,
    ) -> Self {
        let assistant = Assistant::new(llm.clone(), config.llm.model.clone());
        let rag = WikiRagOrchestrator::new(llm, wiki, config.llm.model.clone(), config.rag.clone());

        Self {
            config,
            assistant,
            rag,
        }
    }

    /// Create state with the HTTP clients described by `config`
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let llm = Arc::new(OpenAiClient::from_config(&config.llm)?);
        let wiki = Arc::new(WikipediaClient::from_config(&config.wiki)?);
        Ok(Self::new(config, llm, wiki))
    }
}
