//! Completion API passthrough handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use laz_core::ChatRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Chat reply
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    /// Assistant message
    pub message: String,
}

/// Request body carrying free text
#[derive(Debug, Deserialize, ToSchema)]
pub struct TextPayload {
    #[schema(example = "Ohrid is a city on the shore of Lake Ohrid.")]
    pub text: String,
}

/// Summary of the submitted text
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Sentiment classification
#[derive(Debug, Serialize, ToSchema)]
pub struct SentimentResponse {
    /// Raw model reply, usually JSON with `label` and `explanation`
    #[schema(example = "{\"label\": \"Positive\", \"explanation\": \"...\"}")]
    pub result: String,
}

/// Continue a conversation
#[utoipa::path(
    post,
    path = "/chat",
    tag = "completion",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 422, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Completion API error", body = crate::error::ApiError)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = payload?;
    tracing::info!(messages = request.messages.len(), "POST /chat");

    let message = state.assistant.chat(&request).await?;
    Ok(Json(ChatReply { message }))
}

/// Summarize text
#[utoipa::path(
    post,
    path = "/summarize",
    tag = "completion",
    request_body = TextPayload,
    responses(
        (status = 200, description = "Summary", body = SummaryResponse),
        (status = 422, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Completion API error", body = crate::error::ApiError)
    )
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextPayload>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let Json(payload) = payload?;
    tracing::info!(chars = payload.text.len(), "POST /summarize");

    let summary = state.assistant.summarize(&payload.text).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// Classify sentiment as Positive, Neutral or Negative
#[utoipa::path(
    post,
    path = "/sentiment",
    tag = "completion",
    request_body = TextPayload,
    responses(
        (status = 200, description = "Raw classification text", body = SentimentResponse),
        (status = 422, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Completion API error", body = crate::error::ApiError)
    )
)]
pub async fn sentiment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextPayload>, JsonRejection>,
) -> Result<Json<SentimentResponse>, AppError> {
    let Json(payload) = payload?;
    tracing::info!(chars = payload.text.len(), "POST /sentiment");

    let result = state.assistant.sentiment(&payload.text).await?;
    Ok(Json(SentimentResponse { result }))
}
