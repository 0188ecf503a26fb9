use crate::error::{Error, Result};
use crate::news::{NewsResponse, SourcesResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

pub const TOP_HEADLINES: &str = "top-headlines";
pub const EVERYTHING: &str = "everything";
pub const SOURCES: &str = "sources";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body sent by the upstream API alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[allow(dead_code)]
    status: Option<String>,
    #[allow(dead_code)]
    code: Option<String>,
    message: Option<String>,
}

/// HTTP client for a NewsAPI-compatible backend.
///
/// Issues one GET per call, appends the service credential to every
/// outgoing parameter set, and enforces an explicit per-call timeout.
/// Failures surface immediately; there are no retries and the caller's
/// cache is never touched on error.
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_duration: Duration,
}

impl NewsClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid base URL: {}", e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::InvalidUrl(format!("Unsupported scheme: {}", scheme)));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .user_agent(format!("newsdesk/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_duration: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_duration = timeout;
        self
    }

    /// Fetch a headline or search result set.
    pub async fn get_news(&self, endpoint: &str, params: &[(String, String)]) -> Result<NewsResponse> {
        self.get_json(endpoint, params).await
    }

    /// Fetch the source listing.
    pub async fn get_source_list(&self, params: &[(String, String)]) -> Result<SourcesResponse> {
        self.get_json(SOURCES, params).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting {} with {} parameters", endpoint, params.len());

        let response = timeout(self.timeout_duration, self.send(&url, params))
            .await
            .map_err(|_| Error::Timeout(format!("Request to {} timed out", endpoint)))??;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| format!("Failed to fetch news (HTTP {})", status.as_u16()));
            warn!("Upstream rejected {} request: {}", endpoint, message);
            return Err(Error::Upstream(message));
        }

        debug!("Received {} bytes from {}", body.len(), endpoint);
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, url: &str, params: &[(String, String)]) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .query(params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request failed: {}", e)))
    }
}
