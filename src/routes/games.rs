use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::ip::MaybeRemoteAddr,
    state::{AppState, GAMES_ENDPOINT},
    types::{GamesQuery, PageRequest, PageResult},
};

/// `GET /api/games?q=&page=&per_page=`
///
/// Re-scans the ROM directory on every call. A missing directory lists as empty.
pub async fn list_games(
    State(state): State<AppState>,
    maybe_remote: MaybeRemoteAddr,
    headers: HeaderMap,
    query: Result<Query<GamesQuery>, QueryRejection>,
) -> AppResult<Json<PageResult>> {
    state
        .rate_limiter
        .check_endpoint_limit(GAMES_ENDPOINT, maybe_remote.client_ip(&headers))
        .await?;

    let Query(raw) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let req = PageRequest::from_query(raw, &state.config.catalog);

    let catalog = state.catalog.clone();
    let page = tokio::task::spawn_blocking(move || catalog.list(&req)).await?;

    state.metrics.inc_listings_served();
    tracing::debug!(total = page.total, page = page.page, per_page = page.per_page, "listed games");
    Ok(Json(page))
}
