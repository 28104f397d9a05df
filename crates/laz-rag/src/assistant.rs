//! Direct completion endpoints: chat, summarize, sentiment

use crate::prompts;
use laz_core::{ChatRequest, CompletionClient, Result};
use std::sync::Arc;

/// Thin wrapper pairing the completion client with the fixed-prompt model
pub struct Assistant {
    llm: Arc<dyn CompletionClient>,
    model: String,
}

impl Assistant {
    pub fn new(llm: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// Continue a conversation; the caller picks the model
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        tracing::debug!(
            messages = request.messages.len(),
            model = request.model_name(),
            "Chat completion"
        );
        self.llm.complete(prompts::chat(request)).await
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        self.llm.complete(prompts::summarize(text, &self.model)).await
    }

    /// Raw model reply; JSON is requested but not validated
    pub async fn sentiment(&self, text: &str) -> Result<String> {
        self.llm.complete(prompts::sentiment(text, &self.model)).await
    }
}
