use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::EndpointRateLimiter;

/// Endpoint keys used for per-endpoint rate limiting.
pub const GAMES_ENDPOINT: &str = "/api/games";
pub const ROMS_ENDPOINT: &str = "/api/roms";

/// The shared application state.
///
/// Cloned into every handler by axum. Nothing in here caches catalog data;
/// the [`Catalog`] only knows where to look.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The ROM catalog, built from `config.catalog`.
    pub catalog: Catalog,
    /// Request counters.
    pub metrics: Metrics,
    /// The per-endpoint rate limiter.
    ///
    /// Empty when `rate_limit.enabled` is false, which disables all checks.
    pub rate_limiter: EndpointRateLimiter,
}

impl AppState {
    /// Creates a new `AppState` from a validated configuration.
    pub fn new(config: AppConfig) -> Self {
        let rate_limiter = if config.rate_limit.enabled {
            EndpointRateLimiter::new().with_limits(vec![
                (GAMES_ENDPOINT, config.rate_limit.games_per_minute, 60),
                (ROMS_ENDPOINT, config.rate_limit.roms_per_minute, 60),
            ])
        } else {
            EndpointRateLimiter::new()
        };

        Self {
            catalog: Catalog::from_config(&config.catalog),
            config: Arc::new(config),
            metrics: Metrics::new(),
            rate_limiter,
        }
    }
}
