//! Dashboard backend over HTTP

use crate::error::{DashboardError, Result};
use crate::remote::{ChannelSearch, ConfigStore, PairRequest, PairingService};
use crate::types::{ChannelResult, Configuration, Device};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("sbtv-console/", env!("CARGO_PKG_VERSION"));

const SAVE_FAILED: &str = "Failed to save config";
const PAIR_FAILED: &str = "Pairing failed";
const SEARCH_FAILED: &str = "Search failed";

/// Client for the dashboard's `/api` routes
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn config_url(&self) -> String {
        format!("{}/api/config", self.base_url)
    }

    fn pair_url(&self) -> String {
        format!("{}/api/pair", self.base_url)
    }

    fn search_url(&self, term: &str) -> String {
        format!(
            "{}/api/channels/search?query={}",
            self.base_url,
            urlencoding::encode(term)
        )
    }
}

/// Extract a FastAPI-style `{"detail": "..."}` message from an error body
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
}

/// Read a failed response into a message, falling back to `generic`
async fn failure_message(response: Response, generic: &str) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| generic.to_string());
    warn!(%status, %message, "backend request failed");
    message
}

#[async_trait]
impl ConfigStore for HttpBackend {
    async fn fetch(&self) -> Result<Configuration> {
        let url = self.config_url();
        debug!(%url, "fetching config");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DashboardError::Load(format!("HTTP {}: {}", response.status(), url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Load(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| DashboardError::Load(e.to_string()))
    }

    async fn store(&self, config: &Configuration) -> Result<()> {
        let response = self
            .client
            .post(self.config_url())
            .json(config)
            .send()
            .await
            .map_err(|e| DashboardError::Save(format!("{}: {}", SAVE_FAILED, e)))?;

        if !response.status().is_success() {
            return Err(DashboardError::Save(failure_message(response, SAVE_FAILED).await));
        }
        Ok(())
    }
}

#[async_trait]
impl PairingService for HttpBackend {
    async fn pair(&self, request: &PairRequest) -> Result<Device> {
        let response = self
            .client
            .post(self.pair_url())
            .json(request)
            .send()
            .await
            .map_err(|e| DashboardError::Pair(format!("{}: {}", PAIR_FAILED, e)))?;

        if !response.status().is_success() {
            return Err(DashboardError::Pair(failure_message(response, PAIR_FAILED).await));
        }

        response
            .json::<Device>()
            .await
            .map_err(|e| DashboardError::Pair(format!("{}: {}", PAIR_FAILED, e)))
    }
}

#[async_trait]
impl ChannelSearch for HttpBackend {
    async fn search_channels(&self, term: &str) -> Result<Vec<ChannelResult>> {
        let response = self
            .client
            .get(self.search_url(term))
            .send()
            .await
            .map_err(|e| DashboardError::Search(format!("{}: {}", SEARCH_FAILED, e)))?;

        if !response.status().is_success() {
            return Err(DashboardError::Search(failure_message(response, SEARCH_FAILED).await));
        }

        let mut results = response
            .json::<Vec<ChannelResult>>()
            .await
            .map_err(|e| DashboardError::Search(format!("{}: {}", SEARCH_FAILED, e)))?;

        // YouTube returns titles with HTML entities
        for result in &mut results {
            result.name = html_escape::decode_html_entities(&result.name).to_string();
        }
        Ok(results)
    }
}
