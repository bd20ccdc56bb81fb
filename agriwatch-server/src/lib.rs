//! # agriwatch-server
//!
//! The two proxy endpoints fronting agriwatch's external collaborators:
//!
//! - `GET /api/sensor-data` - one realtime-database read, returned as JSON
//! - `POST /api/prediction` - validates the image payload, then forwards the
//!   body verbatim to the classification service and returns its response
//!   unchanged
//!
//! Both endpoints return structured error bodies; nothing is swallowed
//! server-side. A `GET /health` endpoint answers liveness probes.
//!
//! Configuration (database URL, classification URL, listen address) comes
//! from the environment with an `AGRIWATCH_` prefix; see [`config`].

pub mod config;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use agriwatch_adapters::{ClassifierClient, FirebaseSource};

/// Shared handler state: the database reader and the classification client.
#[derive(Debug, Clone)]
pub struct AppState {
    pub reader: FirebaseSource,
    pub classifier: ClassifierClient,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/sensor-data", get(routes::sensor_data))
        .route("/api/prediction", post(routes::prediction))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
