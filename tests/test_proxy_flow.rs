//! End-to-end tests through the real service against a mocked upstream.
//!
//! These validate the full flow: HTTP request → cache lookup → upstream
//! fetch → store → response, including the freshness-window guarantee that
//! repeated requests do not hit the upstream again.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use market_proxy::server::{build_router, AppState};
use market_proxy::{
    AsyncBinanceClient, AsyncMarketData, BinanceClient, Config, MarketCache, MarketDataService,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app_for(upstream_url: String, ttl: Duration) -> Router {
    let client = Arc::new(AsyncBinanceClient::new(BinanceClient::with_base_url(
        upstream_url,
    ))) as Arc<dyn AsyncMarketData>;
    let service = Arc::new(MarketDataService::new(client, MarketCache::new(ttl)));
    let state = Arc::new(AppState::new(service, Config::default()));
    build_router(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_repeated_price_requests_hit_upstream_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(mockito::Matcher::UrlEncoded(
            "symbol".into(),
            "SHIBUSDT".into(),
        ))
        .with_status(200)
        .with_body(r#"{"symbol":"SHIBUSDT","price":"0.00001234"}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app_for(server.url(), Duration::from_secs(60));

    let (status1, body1) = get(&app, "/api/price").await;
    let (status2, body2) = get(&app, "/api/price").await;

    assert_eq!(status1, StatusCode::OK);
    assert_eq!(status2, StatusCode::OK);
    assert_eq!(body1, body2);

    // Second request was served from cache
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stale_entry_is_refetched() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"price":"0.00001"}"#)
        .expect(2)
        .create_async()
        .await;

    let app = app_for(server.url(), Duration::from_millis(40));

    let (status1, _) = get(&app, "/api/price").await;
    tokio::time::sleep(Duration::from_millis(70)).await;
    let (status2, _) = get(&app, "/api/price").await;

    assert_eq!(status1, StatusCode::OK);
    assert_eq!(status2, StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_distinct_klines_tuples_are_cached_independently() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v3/klines")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;

    let app = app_for(server.url(), Duration::from_secs(60));

    // Two distinct tuples: two upstream calls
    get(&app, "/api/klines?interval=1h&limit=10&startTime=100").await;
    get(&app, "/api/klines?interval=1h&limit=10&startTime=200").await;

    // Repeats of both tuples: no further upstream calls
    get(&app, "/api/klines?interval=1h&limit=10&startTime=100").await;
    get(&app, "/api/klines?interval=1h&limit=10&startTime=200").await;

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upstream_failure_is_not_cached() {
    let mut server = mockito::Server::new_async().await;

    let failing = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("maintenance")
        .expect(1)
        .create_async()
        .await;

    let app = app_for(server.url(), Duration::from_secs(60));

    let (status, body) = get(&app, "/api/price").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch price data");
    failing.assert_async().await;

    // Upstream recovers; newest mock takes precedence
    let recovered = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"price":"0.00002"}"#)
        .expect(1)
        .create_async()
        .await;

    // The failure was not cached: this goes upstream and succeeds
    let (status, body) = get(&app, "/api/price").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "0.00002");
    recovered.assert_async().await;
}
