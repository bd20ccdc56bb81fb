//! Request handlers for the proxy endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};
use tracing::{error, warn};

use agriwatch_adapters::AdapterError;

use crate::AppState;

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/sensor-data` - read the database snapshot and return it as JSON.
///
/// A read failure answers with status 500 and a fixed error body; the
/// detail stays in the server log.
pub async fn sensor_data(State(state): State<AppState>) -> Response {
    match state.reader.read().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => {
            error!("failed to read snapshot: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch data" })),
            )
                .into_response()
        }
    }
}

/// `POST /api/prediction` - validate, then forward the body verbatim to the
/// classification service and return its JSON verbatim.
///
/// A missing or empty `image_base64` is rejected with 400 before any
/// upstream call. Upstream failures come back with the upstream status and
/// body so callers can diagnose without server-side log access.
pub async fn prediction(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    if let Err((status, error_body)) = validate_image_payload(&body) {
        return (status, Json(error_body)).into_response();
    }

    match state.classifier.forward(&body).await {
        Ok(value) => Json(value).into_response(),
        Err(err) => {
            warn!("classification request failed: {}", err);
            let (status, error_body) = classification_error(err);
            (status, Json(error_body)).into_response()
        }
    }
}

/// Check that the request body carries a non-empty `image_base64` string.
fn validate_image_payload(body: &Value) -> Result<(), (StatusCode, Value)> {
    match body.get("image_base64") {
        Some(Value::String(image)) if !image.is_empty() => Ok(()),
        _ => Err((
            StatusCode::BAD_REQUEST,
            json!({ "error": "Missing image_base64 in request body" }),
        )),
    }
}

/// Map an upstream failure to the response contract.
///
/// An upstream answer keeps its status code and body (`apiResponse`); a
/// failure with no upstream status (timeout, connect error) becomes 500.
fn classification_error(err: AdapterError) -> (StatusCode, Value) {
    match err {
        AdapterError::Upstream { status, body } => {
            let api_response =
                serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            let status_code =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status_code,
                json!({
                    "error": "External API request failed",
                    "details": format!("upstream returned status {}", status),
                    "status": status,
                    "apiResponse": api_response,
                }),
            )
        }
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "External API request failed",
                "details": other.to_string(),
                "status": Value::Null,
                "apiResponse": Value::Null,
            }),
        ),
    }
}
