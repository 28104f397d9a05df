//! Lazarova RAG - Wikipedia-grounded answers
//!
//! This crate wires the completion API and Wikipedia together:
//! - `llm`: OpenAI-compatible completion client
//! - `prompts`: the request shape of every completion call
//! - `Assistant`: chat, summarize and sentiment
//! - `WikiRagOrchestrator`: topic extraction, retrieval and cited answer
//!
//! The enriched-answer flow is strictly sequential; each step needs the
//! previous step's output.

use laz_core::{
    CompletionClient, EnrichedAnswer, LazError, PageSummary, RagConfig, Result, SearchHit,
    WikiLookup, WikiSource,
};
use std::sync::Arc;
use std::time::Instant;

pub mod assistant;
pub mod llm;
pub mod prompts;

pub use assistant::Assistant;
pub use llm::OpenAiClient;

/// Detail returned when the search has no hits
pub const NO_RESULTS: &str = "No Wikipedia results";

/// Detail returned when the top hit has no summary page
pub const NO_SUMMARY: &str = "No summary for top result";

// ============================================================================
// RAG Orchestrator
// ============================================================================

/// Wikipedia RAG orchestrator
pub struct WikiRagOrchestrator {
    /// LLM client
    llm: Arc<dyn CompletionClient>,

    /// Wikipedia search and summary source
    wiki: Arc<dyn WikiSource>,

    /// Model used for topic extraction and the cited answer
    model: String,

    /// Prompt parameters
    config: RagConfig,
}

impl WikiRagOrchestrator {
    /// Create a new orchestrator
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        wiki: Arc<dyn WikiSource>,
        model: impl Into<String>,
        config: RagConfig,
    ) -> Self {
        Self {
            llm,
            wiki,
            model: model.into(),
            config,
        }
    }

    /// Search `query` verbatim and summarize the top hit
    pub async fn lookup(&self, query: &str) -> Result<WikiLookup> {
        let (hit, summary) = self.retrieve(query).await?;
        Ok(WikiLookup::new(hit, summary))
    }

    /// Answer `question` from the Wikipedia page its topic points at
    pub async fn answer(&self, question: &str) -> Result<EnrichedAnswer> {
        let start_time = Instant::now();
        tracing::info!("Enriched answer started");

        // 1. Reduce the question to a search term
        let topic = self.extract_topic(question).await;

        // 2-3. Top hit and its summary
        let (hit, summary) = self.retrieve(&topic).await?;
        tracing::debug!(hit = %hit.title, cited = %summary.title, "Context retrieved");

        // 4. Final answer grounded in the summary
        let request = prompts::cited_answer(question, &summary, &self.model, &self.config);
        let answer = self.llm.complete(request).await?;

        tracing::info!(
            chars = answer.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Enriched answer completed"
        );

        Ok(EnrichedAnswer::new(answer, summary))
    }

    /// Topic for the search step, falling back to the raw question
    ///
    /// Never fails: an error, an empty reply or `UNKNOWN` all mean the
    /// question itself is searched.
    pub async fn extract_topic(&self, question: &str) -> String {
        let request = prompts::topic_extraction(question, &self.model, &self.config);

        match self.llm.complete(request).await {
            Ok(topic) if prompts::is_usable_topic(&topic) => {
                let topic = topic.trim().to_string();
                tracing::debug!(%topic, "Topic extracted");
                topic
            }
            Ok(topic) => {
                tracing::debug!(reply = %topic, "No usable topic, searching the question");
                question.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Topic extraction failed, searching the question");
                question.to_string()
            }
        }
    }

    async fn retrieve(&self, topic: &str) -> Result<(SearchHit, PageSummary)> {
        let hit = self
            .wiki
            .search(topic)
            .await?
            .ok_or_else(|| LazError::NotFound(NO_RESULTS.to_string()))?;

        let summary = self
            .wiki
            .summary(&hit.title)
            .await?
            .ok_or_else(|| LazError::NotFound(NO_SUMMARY.to_string()))?;

        Ok((hit, summary))
    }
}

// ============================================================================
// Tests
// ============================================================================
