use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, no rate limiting
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: the ROM directory must be readable. Timeout guards slow mounts.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let dir = state.catalog.dir().to_path_buf();
    match tokio::time::timeout(std::time::Duration::from_secs(5), tokio::fs::read_dir(&dir)).await {
        Ok(Ok(_)) => (StatusCode::OK, "ready".to_string()).into_response(),
        Ok(Err(e)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("not ready: ROMs directory '{}': {}", dir.display(), e),
        )
            .into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout".to_string()).into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP romshelf_listings_served Game listings served\n# TYPE romshelf_listings_served counter\nromshelf_listings_served {}\n\
# HELP romshelf_roms_served ROM downloads started\n# TYPE romshelf_roms_served counter\nromshelf_roms_served {}\n\
# HELP romshelf_roms_not_found ROM requests for names not in the catalog\n# TYPE romshelf_roms_not_found counter\nromshelf_roms_not_found {}\n\
# HELP romshelf_roms_failed ROMs listed but unreadable\n# TYPE romshelf_roms_failed counter\nromshelf_roms_failed {}\n\
# HELP romshelf_bytes_served ROM bytes served\n# TYPE romshelf_bytes_served counter\nromshelf_bytes_served {}\n\
# HELP romshelf_uptime_seconds Uptime seconds\n# TYPE romshelf_uptime_seconds gauge\nromshelf_uptime_seconds {}\n",
        m.listings_served, m.roms_served, m.roms_not_found, m.roms_failed, m.bytes_served, m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
