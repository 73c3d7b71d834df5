//! Service layer connecting the HTTP boundary to the cache and upstream client.

pub mod market_service;

pub use market_service::{MarketDataService, MarketService};
