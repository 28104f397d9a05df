//! Lazarova API - HTTP server
//!
//! Provides HTTP endpoints for chat, summarization, sentiment, Wikipedia
//! lookup and Wikipedia-grounded answers, plus OpenAPI docs.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{http::HeaderValue, Router};
use laz_core::{ChatMessage, ChatRequest, EnrichedAnswer, WikiLookup};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    info(title = "Lazarova AI FastAPI - Minimal"),
    paths(
        handlers::health::root,
        handlers::completion::chat,
        handlers::completion::summarize,
        handlers::completion::sentiment,
        handlers::wiki::wiki,
        handlers::wiki::answer_enriched,
    ),
    components(schemas(
        ChatMessage,
        ChatRequest,
        WikiLookup,
        EnrichedAnswer,
        error::ApiError,
        handlers::health::ServiceInfo,
        handlers::completion::ChatReply,
        handlers::completion::TextPayload,
        handlers::completion::SummaryResponse,
        handlers::completion::SentimentResponse,
        handlers::wiki::QuestionPayload,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "completion", description = "Completion API passthrough"),
        (name = "wikipedia", description = "Wikipedia lookup and cited answers")
    )
)]
pub struct ApiDoc;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the configured origins
///
/// Credentials are allowed, so methods and headers mirror the preflight
/// request instead of using a wildcard.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
