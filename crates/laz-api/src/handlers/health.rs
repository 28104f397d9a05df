//! Health check handler

use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Name reported by the health check
pub const SERVICE_NAME: &str = "Lazarova AI FastAPI";

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub ok: bool,
    #[schema(example = "Lazarova AI FastAPI")]
    pub service: String,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = ServiceInfo)
    )
)]
pub async fn root() -> impl IntoResponse {
    Json(ServiceInfo {
        ok: true,
        service: SERVICE_NAME.to_string(),
    })
}
