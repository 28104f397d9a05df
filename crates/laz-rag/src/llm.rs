//! LLM Client implementation
//!
//! OpenAI-compatible "create chat completion" client. Every failure
//! (transport, timeout, non-2xx status, unparsable body, empty choice)
//! is reported as [`LazError::Llm`] with the upstream message.

use async_trait::async_trait;
use laz_core::{CompletionClient, CompletionRequest, LazError, LlmConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// ============================================================================
// OpenAI Client
// ============================================================================

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LazError::Config(format!("Failed to build LLM client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| LazError::Config("OpenAI API key required".to_string()))?;

        Ok(Self::new(api_key.clone(), Duration::from_secs(config.timeout_secs))?
            .with_base_url(config.base_url.clone()))
    }

    /// Set custom base URL (for Azure or compatible APIs)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling completion API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LazError::Llm(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LazError::Llm(describe_error(status.as_u16(), &error_text)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LazError::Llm(format!("Failed to read response: {e}")))?;

        let content = first_choice_content(&body)?;
        tracing::debug!(chars = content.len(), "Completion received");
        Ok(content)
    }
}

/// Trimmed text of the first choice
fn first_choice_content(body: &str) -> Result<String> {
    let parsed: OpenAiResponse = serde_json::from_str(body)
        .map_err(|e| LazError::Llm(format!("Failed to parse response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| LazError::Llm("No response generated".to_string()))
}

/// Error code plus the API's own message when the body carries one
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => format!("Error code: {status} - {}", parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("Error code: {status}"),
        Err(_) => format!("Error code: {status} - {}", body.trim()),
    }
}

// ============================================================================
// Tests
// ============================================================================
