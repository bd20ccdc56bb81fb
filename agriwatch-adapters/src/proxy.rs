//! Snapshot reader against the agriwatch proxy endpoint.
//!
//! Browser clients never talk to the database directly; they poll
//! `GET /api/sensor-data` on the proxy. This source does the same, which
//! keeps database credentials on the server side.

use std::time::Duration;

use reqwest::Client;

use agriwatch_types::Snapshot;

use crate::AdapterError;

/// Snapshot reader that polls the agriwatch-server sensor-data endpoint.
#[derive(Debug, Clone)]
pub struct ProxySource {
    client: Client,
    base_url: String,
    description: String,
}

impl ProxySource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> ProxySourceBuilder {
        ProxySourceBuilder::default()
    }

    /// Read the current snapshot through the proxy.
    pub async fn read(&self) -> Result<Snapshot, AdapterError> {
        let url = format!("{}/api/sensor-data", self.base_url.trim_end_matches('/'));

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            // The proxy answers read failures with `{"error": ...}`.
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("proxy returned status {}", status));
            return Err(AdapterError::Http(detail));
        }

        response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))
    }

    /// The proxy base URL this source reads from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Human-readable description of this source.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`ProxySource`].
#[derive(Debug, Default)]
pub struct ProxySourceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ProxySourceBuilder {
    /// Set the proxy base URL (e.g. "http://localhost:3000").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> ProxySource {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let description = format!("proxy: {}", base_url);

        ProxySource {
            client,
            base_url,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let source = ProxySource::builder().build();
        assert_eq!(source.base_url(), "http://localhost:3000");
        assert_eq!(source.description(), "proxy: http://localhost:3000");
    }

    #[test]
    fn builder_custom() {
        let source = ProxySource::builder()
            .base_url("http://dashboard.local:8080/")
            .build();
        assert_eq!(source.base_url(), "http://dashboard.local:8080/");
    }
}
