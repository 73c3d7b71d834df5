//! The response cache shared by all request handlers.

use crate::cache::TimedCache;
use serde_json::Value;
use std::time::Duration;

/// The three independent cache domains of the proxy.
///
/// `price` and `stats` hold a single entry each (unit key); `klines` maps a
/// derived parameter-tuple key to its entry, and grows with the number of
/// distinct tuples ever requested — keys never requested again stay until
/// [`cleanup_expired`](Self::cleanup_expired) runs. Writing one domain never
/// affects the others.
#[derive(Debug, Clone)]
pub struct MarketCache {
    price: TimedCache<(), Value>,
    stats: TimedCache<(), Value>,
    klines: TimedCache<String, Value>,
}

impl MarketCache {
    /// Create a cache whose domains all share one freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            price: TimedCache::new(ttl),
            stats: TimedCache::new(ttl),
            klines: TimedCache::new(ttl),
        }
    }

    /// The single-entry ticker-price domain.
    pub fn price(&self) -> &TimedCache<(), Value> {
        &self.price
    }

    /// The single-entry 24-hour statistics domain.
    pub fn stats(&self) -> &TimedCache<(), Value> {
        &self.stats
    }

    /// The keyed candlestick domain.
    pub fn klines(&self) -> &TimedCache<String, Value> {
        &self.klines
    }

    /// Drop expired entries from every domain.
    pub fn cleanup_expired(&self) {
        self.price.cleanup_expired();
        self.stats.cleanup_expired();
        self.klines.cleanup_expired();
    }
}
