//! API route definitions

use crate::handlers::{completion, health, wiki};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Service routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        // Completion endpoints
        .route("/chat", post(completion::chat))
        .route("/summarize", post(completion::summarize))
        .route("/sentiment", post(completion::sentiment))
        // Wikipedia endpoints
        .route("/wiki", get(wiki::wiki))
        .route("/answer_enriched", post(wiki::answer_enriched))
}
