//! Lazarova Core - Domain models, traits, and shared types
//!
//! This crate defines the abstractions shared by the backend crates:
//! - Chat and Wikipedia payload models
//! - Common error types
//! - Collaborator traits for the completion API and Wikipedia
//! - Configuration management

pub mod config;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{
    AppConfig, ConfigError, LlmConfig, LoggingConfig, RagConfig, ServerConfig, WikiConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for backend operations
#[derive(Error, Debug)]
pub enum LazError {
    /// Client-correctable lookup miss (no search hit, no page summary)
    #[error("{0}")]
    NotFound(String),

    /// Completion API failure (auth, rate limit, network, malformed response)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Wikipedia API failure (network, timeout, unexpected status or body)
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LazError>;

// ============================================================================
// Chat Models
// ============================================================================

/// Default system prompt for `/chat` when the caller omits one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Default model for `/chat` when the caller omits one
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Number of trailing conversation messages forwarded to the completion API
pub const MAX_CHAT_HISTORY: usize = 8;

/// A single conversational turn
///
/// `role` is passed through as-is (system/user/assistant by convention).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "What is the capital of North Macedonia?")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Conversation forwarded by `/chat`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Conversation in chronological order
    pub messages: Vec<ChatMessage>,

    /// System prompt; `null` or missing falls back to the default
    #[serde(default)]
    #[schema(example = "You are a helpful assistant.")]
    pub system: Option<String>,

    /// Model name; `null` or missing falls back to the default
    #[serde(default)]
    #[schema(example = "gpt-4o-mini")]
    pub model: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            system: None,
            model: None,
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.system.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_CHAT_MODEL)
    }

    /// The trailing window of the conversation that gets forwarded
    pub fn recent_messages(&self) -> &[ChatMessage] {
        let skip = self.messages.len().saturating_sub(MAX_CHAT_HISTORY);
        &self.messages[skip..]
    }
}

/// One "create chat completion" call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

// ============================================================================
// Wikipedia Models
// ============================================================================

/// Top search result with an HTML-free snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

/// Normalized page summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    /// Lead extract, empty when the page has none
    pub extract: String,
    /// Desktop page URL
    pub url: Option<String>,
}

/// Response of the plain Wikipedia lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WikiLookup {
    #[schema(example = "Skopje")]
    pub title: String,
    pub snippet: String,
    pub summary: String,
    #[schema(example = "https://en.wikipedia.org/wiki/Skopje")]
    pub url: Option<String>,
    #[schema(example = "wikipedia")]
    pub source: String,
}

impl WikiLookup {
    pub const SOURCE: &'static str = "wikipedia";

    pub fn new(hit: SearchHit, summary: PageSummary) -> Self {
        Self {
            title: summary.title,
            snippet: hit.snippet,
            summary: summary.extract,
            url: summary.url,
            source: Self::SOURCE.to_string(),
        }
    }
}

/// Final answer of the retrieval-augmented flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EnrichedAnswer {
    pub answer: String,
    #[schema(example = "Skopje")]
    pub cited_title: String,
    pub url: Option<String>,
    #[schema(example = "wikipedia+openai")]
    pub source: String,
}

impl EnrichedAnswer {
    pub const SOURCE: &'static str = "wikipedia+openai";

    pub fn new(answer: impl Into<String>, summary: PageSummary) -> Self {
        Self {
            answer: answer.into(),
            cited_title: summary.title,
            url: summary.url,
            source: Self::SOURCE.to_string(),
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for chat-completion API clients
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion and return the first choice's text
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

/// Trait for Wikipedia lookups
#[async_trait::async_trait]
pub trait WikiSource: Send + Sync {
    /// Top search hit for `term`, `None` when the search has no results
    async fn search(&self, term: &str) -> Result<Option<SearchHit>>;

    /// Summary of the page titled `title`, `None` when the page does not exist
    async fn summary(&self, title: &str) -> Result<Option<PageSummary>>;
}

// ============================================================================
// Tests
// ============================================================================
