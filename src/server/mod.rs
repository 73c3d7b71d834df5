//! HTTP boundary: router assembly, shared state, and middleware.

pub mod routes;

pub use routes::{ErrorBody, HealthResponse};

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Config, ALLOWED_ORIGINS};
use crate::services::MarketService;

/// Shared state injected into every request handler.
pub struct AppState {
    /// Market data service (cache + upstream client)
    pub service: Arc<dyn MarketService>,

    /// Server configuration, echoed by /health
    pub config: Config,
}

impl AppState {
    pub fn new(service: Arc<dyn MarketService>, config: Config) -> Self {
        Self { service, config }
    }
}

/// CORS middleware: GET only, fixed origin allow-list.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/price", get(routes::get_price))
        .route("/api/stats", get(routes::get_stats))
        .route("/api/klines", get(routes::get_klines))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Handler panics surface as 500 instead of tearing down the process
        .layer(CatchPanicLayer::new())
        .layer(cors_layer())
}
