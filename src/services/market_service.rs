//! Market data service layer.
//!
//! Each operation derives a cache key, consults its cache domain, and only
//! goes upstream when no fresh entry exists. Failed fetches propagate without
//! touching the cache, so the next request naturally retries.

use crate::cache::{MarketCache, TimedCache};
use crate::client::AsyncMarketData;
use crate::error::UpstreamResult;
use crate::metrics::Metrics;
use crate::models::KlinesQuery;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Market data operations exposed to the HTTP layer.
#[async_trait]
pub trait MarketService: Send + Sync {
    /// Current ticker price for the configured pair.
    async fn price(&self) -> UpstreamResult<Value>;

    /// Rolling 24-hour ticker statistics.
    async fn stats(&self) -> UpstreamResult<Value>;

    /// Candlestick data for the given parameter tuple.
    async fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value>;
}

/// Default implementation of MarketService backed by the response cache.
pub struct MarketDataService {
    client: Arc<dyn AsyncMarketData>,
    cache: MarketCache,
    metrics: Metrics,
}

impl MarketDataService {
    /// Create a new service over the given upstream client and cache.
    pub fn new(client: Arc<dyn AsyncMarketData>, cache: MarketCache) -> Self {
        Self {
            client,
            cache,
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Serve from `cache` if fresh, otherwise run `fetch` and store the result.
    ///
    /// Wraps [`TimedCache::get_or_fetch`] with hit/miss accounting.
    async fn lookup_or_fetch<K, F, Fut>(
        &self,
        domain: &'static str,
        cache: &TimedCache<K, Value>,
        key: K,
        fetch: F,
    ) -> UpstreamResult<Value>
    where
        K: Eq + Hash + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = UpstreamResult<Value>>,
    {
        let missed = AtomicBool::new(false);

        let result = cache
            .get_or_fetch(key, || {
                missed.store(true, Ordering::Relaxed);
                self.metrics.record_cache_miss();
                tracing::debug!(domain, "cache miss, fetching upstream");
                fetch()
            })
            .await;

        if !missed.load(Ordering::Relaxed) {
            self.metrics.record_cache_hit();
            tracing::debug!(domain, "cache hit");
        }

        result
    }
}

#[async_trait]
impl MarketService for MarketDataService {
    async fn price(&self) -> UpstreamResult<Value> {
        self.lookup_or_fetch("price", self.cache.price(), (), || {
            self.client.ticker_price()
        })
        .await
    }

    async fn stats(&self) -> UpstreamResult<Value> {
        self.lookup_or_fetch("stats", self.cache.stats(), (), || {
            self.client.ticker_24hr()
        })
        .await
    }

    async fn klines(&self, query: &KlinesQuery) -> UpstreamResult<Value> {
        let key = query.cache_key();
        self.lookup_or_fetch("klines", self.cache.klines(), key, || {
            self.client.klines(query)
        })
        .await
    }
}
