//! HTTP route handlers for the romshelf API.
//!
//! - `games`: paginated, searchable catalog listing
//! - `roms`: streaming download of a single catalog entry
//! - `health`: liveness, readiness, metrics and version endpoints

pub mod games;
pub mod health;
pub mod roms;

use axum::http::header::CONTENT_TYPE;
use axum::middleware::from_fn_with_state;
use axum::{routing::get, Router};
use tower_http::compression::predicate::{DefaultPredicate, Predicate};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware::security_headers::security_headers_middleware;
use crate::state::AppState;

// ROM bodies are opaque binaries with a declared Content-Length; leave them alone.
#[derive(Clone)]
struct NoRomCompression(DefaultPredicate);

impl Predicate for NoRomCompression {
    fn should_compress<B: axum::body::HttpBody>(&self, res: &axum::http::Response<B>) -> bool {
        let is_rom = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|s| s.starts_with("application/octet-stream"))
            .unwrap_or(false);
        !is_rom && self.0.should_compress(res)
    }
}

/// Builds the full application router with all middleware applied.
pub fn router(state: AppState) -> Router {
    let cfg = state.config.clone();
    let compression = CompressionLayer::new().compress_when(NoRomCompression(DefaultPredicate::new()));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/api/games", get(games::list_games))
        .route("/api/roms/{game_name}", get(roms::get_rom))
        .with_state(state)
        .layer(compression)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, security_headers_middleware))
        // Front-ends run on other origins (dev servers, static hosting)
        .layer(CorsLayer::permissive())
}
