//! Configuration Management
//!
//! Handles configuration from environment variables and an optional TOML
//! file, with defaults suitable for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Origin allowed when `ALLOWED_ORIGINS` is unset or empty
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Completion API configuration
    pub llm: LlmConfig,

    /// Wikipedia API configuration
    pub wiki: WikiConfig,

    /// Prompt parameters for the enriched-answer flow
    pub rag: RagConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Apply environment variables on top of this config (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_origins(&origins);
        }

        // Completion API
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(secs) = lookup("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_value("LLM_TIMEOUT_SECS", secs)?;
        }

        // Wikipedia
        if let Some(url) = lookup("WIKI_SEARCH_URL") {
            self.wiki.search_url = url;
        }
        if let Some(url) = lookup("WIKI_REST_URL") {
            self.wiki.rest_url = url;
        }
        if let Some(secs) = lookup("WIKI_TIMEOUT_SECS") {
            self.wiki.timeout_secs = parse_value("WIKI_TIMEOUT_SECS", secs)?;
        }
        if let Some(agent) = lookup("WIKI_USER_AGENT") {
            self.wiki.user_agent = agent;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(self)
    }

    /// Check startup requirements
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.llm.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingRequired("OPENAI_API_KEY".to_string())),
        }

        if self.wiki.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WIKI_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Split a comma-separated origin list, falling back to the development origin
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
    } else {
        origins
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

/// Completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI API key
    pub api_key: Option<String>,

    /// API base URL (for Azure or compatible APIs)
    pub base_url: String,

    /// Model used by the fixed-prompt endpoints
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Wikipedia API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// MediaWiki action API endpoint
    pub search_url: String,

    /// REST API base (the summary path is appended)
    pub rest_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            search_url: "https://en.wikipedia.org/w/api.php".to_string(),
            rest_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            timeout_secs: 15,
            user_agent: concat!("lazarova-ai/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Prompt parameters for topic extraction and the cited answer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Question prefix (in characters) sent for topic extraction
    pub topic_max_chars: usize,

    /// Temperature for topic extraction
    pub topic_temperature: f32,

    /// Output token cap for topic extraction
    pub topic_max_tokens: u32,

    /// Temperature for the cited answer
    pub answer_temperature: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            topic_max_chars: 500,
            topic_temperature: 0.2,
            topic_max_tokens: 24,
            answer_temperature: 0.3,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.wiki.timeout_secs, 15);
        assert_eq!(config.rag.topic_max_tokens, 24);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[
                ("API_PORT", "9000"),
                ("OPENAI_API_KEY", "sk-test"),
                ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
                ("LOG_FORMAT", "JSON"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = AppConfig::default()
            .with_overrides(lookup(&[("API_PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "API_PORT"));
    }

    #[test]
    fn test_blank_origins_fall_back() {
        assert_eq!(parse_origins(" , "), vec![DEFAULT_ALLOWED_ORIGIN]);
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(ref key)) if key == "OPENAI_API_KEY"
        ));

        let config = AppConfig::default()
            .with_overrides(lookup(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [llm]
            model = "gpt-4o"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.wiki.timeout_secs, 15);
    }
}
