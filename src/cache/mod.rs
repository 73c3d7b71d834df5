//! Caching utilities for the market proxy.
//!
//! This module provides a generic time-based cache with TTL support and the
//! per-domain response cache built on top of it.

pub mod market_cache;
pub mod timed_cache;

pub use market_cache::MarketCache;
pub use timed_cache::TimedCache;
