//! In-memory collaborators for tests
//!
//! Enabled with the `test-utils` feature so downstream crates can drive
//! the RAG flow and HTTP layer without network access.

use crate::{
    CompletionClient, CompletionRequest, LazError, PageSummary, Result, SearchHit, WikiSource,
};
use std::collections::HashMap;
use std::sync::Mutex;

type Handler = Box<dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync>;

/// Completion client that answers through a closure and records every request
pub struct StubCompletion {
    handler: Handler,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `text`
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fail with an LLM error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| Err(LazError::Llm(message.clone())))
    }

    /// Requests seen so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let reply = (self.handler)(&request);
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        reply
    }
}

/// Wikipedia source backed by maps, recording searched terms
#[derive(Default)]
pub struct StubWiki {
    hits: HashMap<String, SearchHit>,
    summaries: HashMap<String, PageSummary>,
    search_error: Option<String>,
    summary_error: Option<String>,
    searched: Mutex<Vec<String>>,
}

impl StubWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the top hit returned for `term`
    pub fn with_hit(mut self, term: &str, title: &str, snippet: &str) -> Self {
        self.hits.insert(
            term.to_string(),
            SearchHit {
                title: title.to_string(),
                snippet: snippet.to_string(),
            },
        );
        self
    }

    /// Register the summary returned for `title`
    pub fn with_summary(mut self, title: &str, extract: &str, url: Option<&str>) -> Self {
        self.summaries.insert(
            title.to_string(),
            PageSummary {
                title: title.to_string(),
                extract: extract.to_string(),
                url: url.map(str::to_string),
            },
        );
        self
    }

    /// Register a hit for `term` and a summary for the same title
    pub fn with_page(self, term: &str, title: &str, extract: &str, url: &str) -> Self {
        self.with_hit(term, title, extract)
            .with_summary(title, extract, Some(url))
    }

    pub fn failing_search(mut self, message: &str) -> Self {
        self.search_error = Some(message.to_string());
        self
    }

    pub fn failing_summary(mut self, message: &str) -> Self {
        self.summary_error = Some(message.to_string());
        self
    }

    /// Search terms seen so far, in call order
    pub fn searched_terms(&self) -> Vec<String> {
        self.searched.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl WikiSource for StubWiki {
    async fn search(&self, term: &str) -> Result<Option<SearchHit>> {
        if let Ok(mut seen) = self.searched.lock() {
            seen.push(term.to_string());
        }
        if let Some(ref message) = self.search_error {
            return Err(LazError::Upstream(message.clone()));
        }
        Ok(self.hits.get(term).cloned())
    }

    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        if let Some(ref message) = self.summary_error {
            return Err(LazError::Upstream(message.clone()));
        }
        Ok(self.summaries.get(title).cloned())
    }
}
