//! HTTP client for the upstream exchange API.
//!
//! This module provides a synchronous HTTP client that can be used from async
//! contexts via `tokio::task::spawn_blocking`. Response bodies are treated as
//! opaque JSON: the proxy forwards them without interpreting their shape.

mod async_wrapper;
pub use async_wrapper::{AsyncBinanceClient, AsyncMarketData};

use crate::config::{Config, SYMBOL};
use crate::error::{UpstreamError, UpstreamResult};
use crate::metrics::Metrics;
use crate::models::KlinesQuery;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// HTTP client for the upstream exchange REST API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct BinanceClient {
    /// Base URL for the upstream API
    base_url: String,

    /// Trading pair sent with every request
    symbol: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl BinanceClient {
    /// Create a new BinanceClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.upstream_base_url.clone(),
            symbol: SYMBOL.to_string(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a BinanceClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            symbol: SYMBOL.to_string(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request and parse the body as JSON.
    fn get_json(&self, path: &str) -> UpstreamResult<Value> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("GET {}", url);

        let result = self.agent.get(&url).call().map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        if result.is_err() {
            self.metrics.record_http_error();
        }
        self.metrics.record_http_request(duration);

        let body = result?
            .into_string()
            .map_err(|e| UpstreamError::HttpError(e.to_string()))?;

        serde_json::from_str(&body).map_err(UpstreamError::JsonError)
    }

    /// Map a ureq error to an UpstreamError.
    fn map_error(&self, error: ureq::Error) -> UpstreamError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                UpstreamError::ApiError {
                    status: code,
                    message,
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    UpstreamError::HttpError("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    UpstreamError::Timeout
                } else {
                    UpstreamError::HttpError(transport.to_string())
                }
            }
        }
    }

    /// Get the current ticker price for the configured pair.
    pub fn ticker_price(&self) -> UpstreamResult<Value> {
        let path = format!("/api/v3/ticker/price?symbol={}", self.symbol);
        self.get_json(&path)
    }

    /// Get the rolling 24-hour ticker statistics for the configured pair.
    pub fn ticker_24hr(&self) -> UpstreamResult<Value> {
        let path = format!("/api/v3/ticker/24hr?symbol={}", self.symbol);
        self.get_json(&path)
    }

    /// Get candlestick data for the configured pair.
    ///
    /// Absent query parameters are omitted from the upstream request; the
    /// upstream API applies its own defaults and validation.
    pub fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value> {
        let mut path = format!("/api/v3/klines?symbol={}", self.symbol);

        if let Some(interval) = &query.interval {
            path.push_str(&format!("&interval={}", urlencoding::encode(interval)));
        }
        if let Some(limit) = query.limit {
            path.push_str(&format!("&limit={}", limit));
        }
        if let Some(start_time) = query.start_time {
            path.push_str(&format!("&startTime={}", start_time));
        }

        self.get_json(&path)
    }
}
