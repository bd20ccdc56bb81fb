//! Client for the leaf-disease classification service.
//!
//! The service accepts `POST {"image_base64": ...}` and answers with a
//! prediction (`{"predict": ..., "probs": {...}}`). Two call shapes are
//! provided:
//!
//! - [`ClassifierClient::classify`] - typed, used by the dashboard's
//!   prediction cache
//! - [`ClassifierClient::forward`] - verbatim JSON pass-through, used by the
//!   proxy endpoint, which must return the upstream body unchanged
//!
//! Upstream failures keep their status and body ([`AdapterError::Upstream`])
//! so callers can surface them without loss.

use std::time::Duration;

use reqwest::Client;

use agriwatch_types::Prediction;

use crate::AdapterError;

/// Default request timeout for classification calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the classification service.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: Client,
    endpoint: String,
}

impl ClassifierClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ClassifierClientBuilder {
        ClassifierClientBuilder::default()
    }

    /// Classify one image, returning the typed prediction.
    pub async fn classify(&self, image_base64: &str) -> Result<Prediction, AdapterError> {
        let body = serde_json::json!({ "image_base64": image_base64 });
        let value = self.forward(&body).await?;
        serde_json::from_value(value).map_err(|e| AdapterError::Parse(e.to_string()))
    }

    /// Forward a request body verbatim and return the upstream JSON verbatim.
    ///
    /// Non-2xx responses become [`AdapterError::Upstream`] carrying the
    /// upstream status and raw body.
    pub async fn forward(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, AdapterError> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AdapterError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| AdapterError::Parse(e.to_string()))
    }

    /// The upstream endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Builder for [`ClassifierClient`].
#[derive(Debug, Default)]
pub struct ClassifierClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl ClassifierClientBuilder {
    /// Set the prediction service URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> ClassifierClient {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        ClassifierClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8000/predict".to_string()),
        }
    }
}
