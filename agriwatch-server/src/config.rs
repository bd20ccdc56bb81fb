//! Server configuration.
//!
//! Defaults overlaid with environment variables carrying the `AGRIWATCH_`
//! prefix:
//!
//! - `AGRIWATCH_LISTEN_ADDR` - bind address (default `0.0.0.0:3000`)
//! - `AGRIWATCH_DATABASE_URL` - realtime database base URL
//! - `AGRIWATCH_DATABASE_AUTH` - optional database auth token
//! - `AGRIWATCH_DISEASE_API_URL` - classification service URL

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Runtime configuration for the proxy service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,

    /// Realtime database base URL.
    pub database_url: String,

    /// Optional database auth token, passed as the `auth` query parameter.
    #[serde(default)]
    pub database_auth: Option<String>,

    /// Classification service URL requests are forwarded to.
    pub disease_api_url: String,
}

impl ServerConfig {
    /// Load configuration from defaults and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("listen_addr", "0.0.0.0:3000")?
            .set_default("database_url", "http://localhost:9000")?
            .set_default("disease_api_url", "http://localhost:8000/predict")?
            .add_source(Environment::with_prefix("AGRIWATCH"))
            .build()?
            .try_deserialize()
    }
}
