//! Realtime-database snapshot reader using the Firebase REST API.
//!
//! The database root is fetched in one request (`GET {base}/.json`), which
//! matches the single `read() -> Snapshot` operation the dashboard needs.
//! An optional database secret or ID token can be passed as the `auth`
//! query parameter.
//!
//! ## Example
//!
//! ```rust,no_run
//! use agriwatch_adapters::FirebaseSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FirebaseSource::builder()
//!         .database_url("https://mini-project.firebasedatabase.app")
//!         .auth_token("database-secret")
//!         .build();
//!
//!     let snapshot = source.read().await?;
//!     println!("{} controller records", snapshot.mqtt.controller.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;

use agriwatch_types::Snapshot;

use crate::AdapterError;

/// Snapshot reader backed by the Firebase realtime-database REST API.
#[derive(Debug, Clone)]
pub struct FirebaseSource {
    client: Client,
    database_url: String,
    auth_token: Option<String>,
    description: String,
}

impl FirebaseSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> FirebaseSourceBuilder {
        FirebaseSourceBuilder::default()
    }

    /// Read the entire current state tree.
    pub async fn read(&self) -> Result<Snapshot, AdapterError> {
        let url = format!("{}/.json", self.database_url.trim_end_matches('/'));

        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.query(&[("auth", token.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdapterError::Auth(format!(
                "database rejected credentials with status {}",
                status
            )));
        }

        if !status.is_success() {
            return Err(AdapterError::Http(format!(
                "database returned status {}",
                status
            )));
        }

        let body = response.text().await?;

        // A freshly provisioned database serves a literal `null` root.
        if body.trim() == "null" {
            return Ok(Snapshot::default());
        }

        serde_json::from_str(&body).map_err(|e| AdapterError::Parse(e.to_string()))
    }

    /// The database URL this source reads from.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Human-readable description of this source.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`FirebaseSource`].
#[derive(Debug, Default)]
pub struct FirebaseSourceBuilder {
    database_url: Option<String>,
    auth_token: Option<String>,
    timeout: Option<Duration>,
}

impl FirebaseSourceBuilder {
    /// Set the database base URL (e.g. "https://myapp.firebasedatabase.app").
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the auth token passed as the `auth` query parameter.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> FirebaseSource {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let database_url = self
            .database_url
            .unwrap_or_else(|| "http://localhost:9000".to_string());
        let description = format!("firebase: {}", database_url);

        FirebaseSource {
            client,
            database_url,
            auth_token: self.auth_token,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let source = FirebaseSource::builder().build();
        assert_eq!(source.database_url(), "http://localhost:9000");
        assert!(source.auth_token.is_none());
        assert_eq!(source.description(), "firebase: http://localhost:9000");
    }

    #[test]
    fn builder_custom() {
        let source = FirebaseSource::builder()
            .database_url("https://myapp.firebasedatabase.app/")
            .auth_token("secret")
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(source.database_url(), "https://myapp.firebasedatabase.app/");
        assert_eq!(source.auth_token.as_deref(), Some("secret"));
    }
}
