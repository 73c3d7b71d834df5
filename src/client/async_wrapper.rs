//! Async wrapper around the synchronous BinanceClient.
//!
//! This module provides an async interface to the synchronous client by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread
//! pool, preventing blocking of the async runtime.

use crate::client::BinanceClient;
use crate::error::{UpstreamError, UpstreamResult};
use crate::models::KlinesQuery;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Async interface to the upstream market-data API.
///
/// This is the seam between the service layer and the network: tests swap in
/// a mock implementation to exercise caching without a live upstream.
#[async_trait]
pub trait AsyncMarketData: Send + Sync {
    async fn ticker_price(&self) -> UpstreamResult<Value>;
    async fn ticker_24hr(&self) -> UpstreamResult<Value>;
    async fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value>;
}

/// Async wrapper around the synchronous BinanceClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP operations on a
/// dedicated thread pool.
#[derive(Clone)]
pub struct AsyncBinanceClient {
    client: Arc<BinanceClient>,
}

impl AsyncBinanceClient {
    pub fn new(client: BinanceClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl AsyncMarketData for AsyncBinanceClient {
    async fn ticker_price(&self) -> UpstreamResult<Value> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.ticker_price())
            .await
            .map_err(|e| UpstreamError::HttpError(format!("Task join error: {}", e)))?
    }

    async fn ticker_24hr(&self) -> UpstreamResult<Value> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.ticker_24hr())
            .await
            .map_err(|e| UpstreamError::HttpError(format!("Task join error: {}", e)))?
    }

    async fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value> {
        let client = self.client.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || client.klines(&query))
            .await
            .map_err(|e| UpstreamError::HttpError(format!("Task join error: {}", e)))?
    }
}
