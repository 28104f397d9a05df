//! Wikipedia HTTP client
//!
//! Two read-only calls: the action API full-text search and the REST page
//! summary. Both run under a whole-request timeout; transport failures,
//! timeouts and unexpected statuses become [`LazError::Upstream`].

use crate::sanitize::strip_html;
use async_trait::async_trait;
use laz_core::{LazError, PageSummary, Result, SearchHit, WikiConfig, WikiSource};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Wikipedia API client
pub struct WikipediaClient {
    client: Client,
    search_url: String,
    rest_url: String,
}

impl WikipediaClient {
    /// Create a client against explicit endpoints
    pub fn new(
        search_url: impl Into<String>,
        rest_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| LazError::Config(format!("Failed to build Wikipedia client: {e}")))?;

        Ok(Self {
            client,
            search_url: search_url.into(),
            rest_url: rest_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from config
    pub fn from_config(config: &WikiConfig) -> Result<Self> {
        Self::new(
            config.search_url.clone(),
            config.rest_url.clone(),
            Duration::from_secs(config.timeout_secs),
            &config.user_agent,
        )
    }

    fn summary_url(&self, title: &str) -> String {
        // Titles are interpolated as given; callers escape if they need to.
        format!("{}/page/summary/{}", self.rest_url, title)
    }
}

#[async_trait]
impl WikiSource for WikipediaClient {
    async fn search(&self, term: &str) -> Result<Option<SearchHit>> {
        tracing::debug!(term, "Wikipedia search");

        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", term),
                ("format", "json"),
                ("origin", "*"),
            ])
            .send()
            .await
            .map_err(|e| LazError::Upstream(format!("Search request failed: {e}")))?
            .error_for_status()
            .map_err(|e| LazError::Upstream(format!("Search failed: {e}")))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LazError::Upstream(format!("Failed to parse search response: {e}")))?;

        let hit = body.top_hit();
        tracing::debug!(found = hit.is_some(), "Wikipedia search completed");
        Ok(hit)
    }

    async fn summary(&self, title: &str) -> Result<Option<PageSummary>> {
        tracing::debug!(title, "Wikipedia summary");

        let response = self
            .client
            .get(self.summary_url(title))
            .send()
            .await
            .map_err(|e| LazError::Upstream(format!("Summary request failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(title, "No summary page");
            return Ok(None);
        }

        let body: SummaryResponse = response
            .error_for_status()
            .map_err(|e| LazError::Upstream(format!("Summary failed: {e}")))?
            .json()
            .await
            .map_err(|e| LazError::Upstream(format!("Failed to parse summary response: {e}")))?;

        Ok(Some(body.into_summary()))
    }
}

// ============================================================================
// Upstream response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: String,
    snippet: Option<String>,
}

impl SearchResponse {
    /// First hit in upstream ranking order
    fn top_hit(self) -> Option<SearchHit> {
        let top = self.query?.search.into_iter().next()?;
        Some(SearchHit {
            snippet: strip_html(top.snippet.as_deref().unwrap_or_default()),
            title: top.title,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PlatformUrls>,
}

#[derive(Debug, Deserialize)]
struct PlatformUrls {
    page: Option<String>,
}

impl SummaryResponse {
    fn into_summary(self) -> PageSummary {
        let url = self
            .content_urls
            .and_then(|urls| urls.desktop)
            .and_then(|desktop| desktop.page);

        PageSummary {
            title: self.title.unwrap_or_default(),
            extract: self.extract.unwrap_or_default(),
            url,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_search(value: serde_json::Value) -> Option<SearchHit> {
        serde_json::from_value::<SearchResponse>(value)
            .unwrap()
            .top_hit()
    }

    fn parse_summary(value: serde_json::Value) -> PageSummary {
        serde_json::from_value::<SummaryResponse>(value)
            .unwrap()
            .into_summary()
    }

    #[test]
    fn test_top_hit_is_first_result() {
        let hit = parse_search(json!({
            "batchcomplete": "",
            "query": {
                "searchinfo": {"totalhits": 2},
                "search": [
                    {"ns": 0, "title": "Ohrid", "snippet": "<span class=\"searchmatch\">Ohrid</span> is a city"},
                    {"ns": 0, "title": "Lake Ohrid", "snippet": "a lake"}
                ]
            }
        }))
        .unwrap();

        assert_eq!(hit.title, "Ohrid");
        assert_eq!(hit.snippet, "Ohrid is a city");
    }

    #[test]
    fn test_empty_search_is_absent() {
        assert!(parse_search(json!({"query": {"search": []}})).is_none());
        assert!(parse_search(json!({"query": {}})).is_none());
        assert!(parse_search(json!({})).is_none());
    }

    #[test]
    fn test_missing_snippet_is_empty() {
        let hit = parse_search(json!({"query": {"search": [{"title": "Bitola"}]}})).unwrap();
        assert_eq!(hit.snippet, "");
    }

    #[test]
    fn test_summary_full_shape() {
        let summary = parse_summary(json!({
            "type": "standard",
            "title": "Skopje",
            "extract": "Skopje is the capital of North Macedonia.",
            "content_urls": {
                "desktop": {"page": "https://en.wikipedia.org/wiki/Skopje"},
                "mobile": {"page": "https://en.m.wikipedia.org/wiki/Skopje"}
            }
        }));

        assert_eq!(summary.title, "Skopje");
        assert_eq!(summary.extract, "Skopje is the capital of North Macedonia.");
        assert_eq!(
            summary.url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Skopje")
        );
    }

    #[test]
    fn test_summary_without_desktop_url() {
        let summary = parse_summary(json!({
            "title": "Skopje",
            "extract": "text",
            "content_urls": {"mobile": {"page": "https://en.m.wikipedia.org/wiki/Skopje"}}
        }));
        assert!(summary.url.is_none());

        let summary = parse_summary(json!({"title": "Skopje", "content_urls": {"desktop": {}}}));
        assert!(summary.url.is_none());

        let summary = parse_summary(json!({"title": "Skopje"}));
        assert!(summary.url.is_none());
    }

    #[test]
    fn test_summary_missing_fields_default_to_empty() {
        let summary = parse_summary(json!({"extract": null}));
        assert_eq!(summary.title, "");
        assert_eq!(summary.extract, "");
    }

    #[test]
    fn test_summary_url_keeps_title_verbatim() {
        let client = WikipediaClient::new(
            "https://en.wikipedia.org/w/api.php",
            "https://en.wikipedia.org/api/rest_v1/",
            Duration::from_secs(15),
            "test-agent",
        )
        .unwrap();

        assert_eq!(
            client.summary_url("Lake_Ohrid"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Lake_Ohrid"
        );
    }

    // ------------------------------------------------------------------------
    // Local server
    // ------------------------------------------------------------------------

    const AGENT: &str = "lazarova-test/1.0";

    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Search echoes `srsearch` as the title once every fixed parameter matches
    fn wiki_app() -> axum::Router {
        use axum::extract::{Path, Query};
        use axum::http::{header, HeaderMap, StatusCode};
        use axum::routing::get;
        use axum::Json;
        use std::collections::HashMap;

        async fn search(
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> (StatusCode, Json<serde_json::Value>) {
            let expected = [
                ("action", "query"),
                ("list", "search"),
                ("format", "json"),
                ("origin", "*"),
            ];
            let params_ok = expected
                .iter()
                .all(|(k, v)| params.get(*k).map(String::as_str) == Some(*v));
            let agent_ok = headers
                .get(header::USER_AGENT)
                .is_some_and(|agent| agent == AGENT);
            if !params_ok || !agent_ok {
                return (StatusCode::BAD_REQUEST, Json(json!({})));
            }

            let term = params.get("srsearch").cloned().unwrap_or_default();
            if term == "nothing" {
                return (StatusCode::OK, Json(json!({"query": {"search": []}})));
            }
            (
                StatusCode::OK,
                Json(json!({"query": {"search": [{"title": term, "snippet": "x &amp; <b>y</b>"}]}})),
            )
        }

        async fn summary(Path(title): Path<String>) -> (StatusCode, Json<serde_json::Value>) {
            match title.as_str() {
                "missing" => (StatusCode::NOT_FOUND, Json(json!({"type": "not_found"}))),
                "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
                _ => (
                    StatusCode::OK,
                    Json(json!({
                        "title": title,
                        "extract": "A lake.",
                        "content_urls": {"desktop": {"page": format!("https://en.wikipedia.org/wiki/{title}")}}
                    })),
                ),
            }
        }

        axum::Router::new()
            .route("/w/api.php", get(search))
            .route("/broken/api.php", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/rest/page/summary/:title", get(summary))
    }

    async fn local_client(search_path: &str) -> WikipediaClient {
        let base = serve(wiki_app()).await;
        WikipediaClient::new(
            format!("{base}{search_path}"),
            format!("{base}/rest"),
            Duration::from_secs(5),
            AGENT,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_query_parameters() {
        let client = local_client("/w/api.php").await;

        let hit = client.search("Lake Ohrid").await.unwrap().unwrap();
        assert_eq!(hit.title, "Lake Ohrid");
        assert_eq!(hit.snippet, "x & y");

        assert!(client.search("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_error_status_is_upstream() {
        let client = local_client("/broken/api.php").await;

        let err = client.search("Lake Ohrid").await.unwrap_err();
        assert!(matches!(err, LazError::Upstream(ref msg) if msg.starts_with("Search failed")));
    }

    #[tokio::test]
    async fn test_summary_status_mapping() {
        let client = local_client("/w/api.php").await;

        let summary = client.summary("Prespa").await.unwrap().unwrap();
        assert_eq!(summary.title, "Prespa");
        assert_eq!(
            summary.url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Prespa")
        );

        assert!(client.summary("missing").await.unwrap().is_none());

        let err = client.summary("boom").await.unwrap_err();
        assert!(matches!(err, LazError::Upstream(ref msg) if msg.starts_with("Summary failed")));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream() {
        let client = WikipediaClient::new(
            "http://127.0.0.1:9/w/api.php",
            "http://127.0.0.1:9/rest",
            Duration::from_secs(2),
            AGENT,
        )
        .unwrap();

        assert!(matches!(
            client.search("x").await,
            Err(LazError::Upstream(_))
        ));
        assert!(matches!(
            client.summary("x").await,
            Err(LazError::Upstream(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_live_search_without_results() {
        let client = WikipediaClient::from_config(&WikiConfig::default()).unwrap();
        let hit = client.search("ZZZZ_nonexistent_topic_x1").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    #[ignore = "requires network"]
    async fn test_live_summary() {
        let client = WikipediaClient::from_config(&WikiConfig::default()).unwrap();
        let summary = client.summary("Skopje").await.unwrap().unwrap();
        assert_eq!(summary.title, "Skopje");
        assert!(summary.url.is_some());
    }
}
