//! Lazarova API Server

use laz_api::{create_router, state::AppState};
use laz_core::config::{AppConfig, LoggingConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = load_config()?;
    init_tracing(&config.logging);

    // A missing API key stops startup before anything binds
    config.validate()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(origins = ?config.server.allowed_origins, "CORS configured");
    tracing::info!(model = %config.llm.model, "Completion model");

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Lazarova API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);
    tracing::info!("OpenAPI spec at http://{}/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Optional TOML file from `LAZAROVA_CONFIG`, then environment overrides
fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("LAZAROVA_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let level = &logging.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "laz_api={level},laz_rag={level},laz_wiki={level},tower_http={level}"
        ))
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
