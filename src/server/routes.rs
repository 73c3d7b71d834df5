//! Request handlers for the proxied endpoints.
//!
//! Handlers parse query parameters, delegate to the market service, and map
//! outcomes to HTTP responses: success passes the upstream payload through
//! verbatim, a failed fetch becomes a 500 with a structured error body.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::UpstreamError;
use crate::models::KlinesQuery;
use crate::server::AppState;

/// Error body returned for failed upstream fetches and unknown routes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Generic, client-facing message
    pub error: String,

    /// Upstream error detail (omitted for routing errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Response body of the health endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Liveness status, always "ok"
    pub status: String,

    /// Current time (ISO 8601)
    pub timestamp: String,

    /// Deployment environment label
    pub env: String,

    /// Listen port
    pub port: u16,
}

/// Map an upstream failure to a 500 response.
fn upstream_error(message: &str, err: UpstreamError) -> Response {
    tracing::error!(error = %err, "{}", message);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: message.to_string(),
            details: Some(err.to_string()),
        }),
    )
        .into_response()
}

/// GET /api/price
pub async fn get_price(State(state): State<Arc<AppState>>) -> Response {
    match state.service.price().await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => upstream_error("Failed to fetch price data", err),
    }
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.service.stats().await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => upstream_error("Failed to fetch stats data", err),
    }
}

/// GET /api/klines?interval=&limit=&startTime=
pub async fn get_klines(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KlinesQuery>,
) -> Response {
    match state.service.klines(&query).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => upstream_error("Failed to fetch klines data", err),
    }
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        env: state.config.env.clone(),
        port: state.config.port,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Route not found".to_string(),
            details: None,
        }),
    )
        .into_response()
}
