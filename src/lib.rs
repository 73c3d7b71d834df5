//! Market Proxy - a caching reverse proxy for Binance SHIBUSDT market data.
//!
//! This library provides a small HTTP service that forwards price, 24-hour
//! statistics, and candlestick queries for a single trading pair to the
//! Binance REST API, caching each response class for a short fixed window to
//! reduce upstream load.
//!
//! # Architecture
//!
//! - **cache**: time-bounded response cache and its per-endpoint domains
//! - **client**: HTTP client for the upstream exchange API
//! - **services**: lookup-or-fetch orchestration between cache and upstream
//! - **server**: axum routes, CORS, and error mapping
//! - **config**: environment configuration and fixed constants
//! - **error**: custom error types for precise error handling
//! - **metrics**: internal counters for requests and cache effectiveness

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;

pub use cache::{MarketCache, TimedCache};
pub use client::{AsyncBinanceClient, AsyncMarketData, BinanceClient};
pub use config::Config;
pub use error::{ConfigError, UpstreamError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::KlinesQuery;
pub use server::{build_router, AppState, ErrorBody, HealthResponse};
pub use services::{MarketDataService, MarketService};
