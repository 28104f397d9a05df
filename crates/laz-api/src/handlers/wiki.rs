//! Wikipedia lookup and enriched-answer handlers

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use laz_core::{EnrichedAnswer, WikiLookup};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// Query string of `/wiki`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WikiParams {
    /// Search term, used verbatim
    #[param(example = "Lake Ohrid")]
    pub q: String,
}

/// Question for the enriched answer
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuestionPayload {
    #[schema(example = "How deep is the lake next to Ohrid?")]
    pub question: String,
}

/// Top Wikipedia hit with its page summary
#[utoipa::path(
    get,
    path = "/wiki",
    tag = "wikipedia",
    params(WikiParams),
    responses(
        (status = 200, description = "Lookup result", body = WikiLookup),
        (status = 404, description = "No results or no summary", body = crate::error::ApiError),
        (status = 500, description = "Wikipedia error", body = crate::error::ApiError)
    )
)]
pub async fn wiki(
    State(state): State<Arc<AppState>>,
    params: Result<Query<WikiParams>, QueryRejection>,
) -> Result<Json<WikiLookup>, AppError> {
    let Query(params) = params?;
    tracing::info!(q = %params.q, "GET /wiki");

    let lookup = state.rag.lookup(&params.q).await?;
    Ok(Json(lookup))
}

/// Answer a question from the most relevant Wikipedia page, citing it
#[utoipa::path(
    post,
    path = "/answer_enriched",
    tag = "wikipedia",
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Cited answer", body = EnrichedAnswer),
        (status = 404, description = "No results or no summary", body = crate::error::ApiError),
        (status = 422, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Upstream error", body = crate::error::ApiError)
    )
)]
pub async fn answer_enriched(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuestionPayload>, JsonRejection>,
) -> Result<Json<EnrichedAnswer>, AppError> {
    let Json(payload) = payload?;
    tracing::info!(chars = payload.question.len(), "POST /answer_enriched");

    let answer = state.rag.answer(&payload.question).await?;
    Ok(Json(answer))
}
