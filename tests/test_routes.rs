//! Router-level tests against a mocked market service.
//!
//! These exercise the HTTP boundary in isolation: status codes, response
//! bodies, query parsing, the 404 fallback, and the CORS allow-list.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use market_proxy::error::{UpstreamError, UpstreamResult};
use market_proxy::server::{build_router, AppState, ErrorBody, HealthResponse};
use market_proxy::{Config, KlinesQuery, MarketService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Service stub with scripted outcomes, recording the klines query it saw.
struct ScriptedService {
    fail: bool,
    seen_klines: Mutex<Option<KlinesQuery>>,
}

impl ScriptedService {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            seen_klines: Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            seen_klines: Mutex::new(None),
        })
    }

    fn outcome(&self, payload: Value) -> UpstreamResult<Value> {
        if self.fail {
            Err(UpstreamError::HttpError("Connection failed".to_string()))
        } else {
            Ok(payload)
        }
    }
}

#[async_trait]
impl MarketService for ScriptedService {
    async fn price(&self) -> UpstreamResult<Value> {
        self.outcome(json!({"symbol": "SHIBUSDT", "price": "0.00001234"}))
    }

    async fn stats(&self) -> UpstreamResult<Value> {
        self.outcome(json!({"symbol": "SHIBUSDT", "priceChangePercent": "-1.2"}))
    }

    async fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value> {
        *self.seen_klines.lock().unwrap() = Some(query.clone());
        self.outcome(json!([[1, "2", "3"]]))
    }
}

fn app(service: Arc<ScriptedService>) -> Router {
    let state = Arc::new(AppState::new(service, Config::default()));
    build_router(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_price_passes_payload_through() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["price"], "0.00001234");
}

#[tokio::test]
async fn test_stats_passes_payload_through() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["priceChangePercent"], "-1.2");
}

#[tokio::test]
async fn test_klines_parses_typed_query() {
    let service = ScriptedService::ok();
    let response = app(service.clone())
        .oneshot(
            Request::builder()
                .uri("/api/klines?interval=1h&limit=10&startTime=100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let seen = service.seen_klines.lock().unwrap().clone().unwrap();
    assert_eq!(seen.interval.as_deref(), Some("1h"));
    assert_eq!(seen.limit, Some(10));
    assert_eq!(seen.start_time, Some(100));
}

#[tokio::test]
async fn test_klines_absent_params_are_none() {
    let service = ScriptedService::ok();
    let response = app(service.clone())
        .oneshot(
            Request::builder()
                .uri("/api/klines")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let seen = service.seen_klines.lock().unwrap().clone().unwrap();
    assert_eq!(seen, KlinesQuery::default());
}

#[tokio::test]
async fn test_klines_malformed_limit_is_client_error() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/klines?limit=ten")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_500_with_details() {
    let response = app(ScriptedService::failing())
        .oneshot(
            Request::builder()
                .uri("/api/price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.error, "Failed to fetch price data");
    assert!(body.details.unwrap().contains("Connection failed"));
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, json!({"error": "Route not found"}));
}

#[tokio::test]
async fn test_health_reports_liveness() {
    let response = app(ScriptedService::failing())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Health does not depend on the upstream
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.env, "development");
    assert_eq!(health.port, 3000);
    assert!(!health.timestamp.is_empty());
}

#[tokio::test]
async fn test_cors_allows_listed_origin() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/price")
                .header(header::ORIGIN, "https://dubplanet.github.io")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("https://dubplanet.github.io")
    );
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let response = app(ScriptedService::ok())
        .oneshot(
            Request::builder()
                .uri("/api/price")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
