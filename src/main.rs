//! Market Proxy - Main entry point
//!
//! Starts the caching reverse proxy: loads configuration, wires the upstream
//! client and response cache into the service layer, and serves the axum
//! router until interrupted.

use anyhow::Result;
use market_proxy::client::{AsyncBinanceClient, AsyncMarketData};
use market_proxy::config::CACHE_DURATION_MS;
use market_proxy::server::{build_router, AppState};
use market_proxy::{BinanceClient, Config, MarketCache, MarketDataService};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (also loads .env if present)
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        upstream = %config.upstream_base_url,
        env = %config.env,
        "Starting market proxy"
    );

    // Upstream client and its async facade
    let sync_client = BinanceClient::new(&config);
    let http_metrics = sync_client.metrics().clone();
    let client = Arc::new(AsyncBinanceClient::new(sync_client)) as Arc<dyn AsyncMarketData>;

    // Response cache and service
    let cache = MarketCache::new(Duration::from_millis(CACHE_DURATION_MS));
    let service = Arc::new(MarketDataService::new(client, cache));
    let cache_metrics = service.metrics().clone();

    info!("Cache window: {} ms", CACHE_DURATION_MS);

    // Router and listener
    let state = Arc::new(AppState::new(service, config.clone()));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(%addr, error = %e, "Failed to bind listen address");
        e
    })?;

    info!(%addr, "Market proxy listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        upstream_requests = http_metrics.http_requests_total(),
        upstream_errors = http_metrics.http_errors_total(),
        cache_hits = cache_metrics.cache_hits_total(),
        cache_misses = cache_metrics.cache_misses_total(),
        "Market proxy shutdown complete"
    );

    Ok(())
}

/// Wait for Ctrl+C (or SIGTERM on unix) before starting graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
