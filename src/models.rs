//! Request parameter types for the proxied endpoints.
//!
//! Upstream response bodies are passed through opaquely as `serde_json::Value`;
//! only the request side is typed.

use serde::Deserialize;
use std::fmt::Display;

/// Query parameters accepted by the klines (candlestick) endpoint.
///
/// All fields are optional on the wire; the upstream API decides which
/// combinations it accepts. The tuple of parameters identifies a cache entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KlinesQuery {
    /// Candlestick interval, e.g. "1h" or "1d"
    pub interval: Option<String>,

    /// Maximum number of candles to return
    pub limit: Option<u32>,

    /// Earliest open time to include, as a millisecond timestamp
    #[serde(rename = "startTime")]
    pub start_time: Option<i64>,
}

impl KlinesQuery {
    /// Derive the cache key for this parameter tuple.
    ///
    /// The key is the ordered `interval-limit-startTime` tuple joined with
    /// `-`, with absent values rendered as the literal `"undefined"`. The
    /// derivation is deterministic, and injective as long as the interval
    /// token itself contains no `-` (true for every interval the upstream
    /// accepts).
    pub fn cache_key(&self) -> String {
        format!(
            "{}-{}-{}",
            render(&self.interval),
            render(&self.limit),
            render(&self.start_time)
        )
    }
}

fn render<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}
