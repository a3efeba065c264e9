use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use tokio_util::io::ReaderStream;

use crate::{
    catalog::CatalogError,
    error::{AppError, AppResult},
    middleware::ip::MaybeRemoteAddr,
    state::{AppState, ROMS_ENDPOINT},
};

/// `GET /api/roms/{game_name}`
///
/// Streams the named ROM if the current catalog lists it. The name is only
/// ever compared against the scan result, never used as a path on its own.
pub async fn get_rom(
    State(state): State<AppState>,
    maybe_remote: MaybeRemoteAddr,
    headers: HeaderMap,
    game_name: Result<Path<String>, PathRejection>,
) -> AppResult<Response> {
    state
        .rate_limiter
        .check_endpoint_limit(ROMS_ENDPOINT, maybe_remote.client_ip(&headers))
        .await?;

    // Undecodable names (e.g. invalid UTF-8) can never be catalog entries.
    let Ok(Path(game_name)) = game_name else {
        state.metrics.inc_roms_not_found();
        return Err(AppError::NotFound("Game not found".to_string()));
    };

    let rom = match state.catalog.open(&game_name).await {
        Ok(rom) => rom,
        Err(err) => {
            match &err {
                CatalogError::NotFound(_) => state.metrics.inc_roms_not_found(),
                CatalogError::Unreadable { .. } => state.metrics.inc_roms_failed(),
            }
            return Err(err.into());
        }
    };

    let len = rom.len;
    let body = Body::from_stream(ReaderStream::new(rom.file));
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, len)
        .header(header::CONTENT_DISPOSITION, content_disposition(&rom.name))
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build ROM response: {}", e)))?;

    state.metrics.inc_roms_served(len);
    tracing::info!(rom = %rom.name, bytes = len, "serving ROM");
    Ok(response)
}

/// `attachment` disposition carrying the download name.
///
/// Plain ASCII names go in a quoted `filename`; anything else is sent
/// percent-encoded as `filename*` (RFC 6266).
pub fn content_disposition(name: &str) -> HeaderValue {
    let plain = name.chars().all(|c| c.is_ascii_graphic() || c == ' ') && !name.contains(['"', '\\']);
    let value = if plain {
        format!("attachment; filename=\"{}\"", name)
    } else {
        format!("attachment; filename*=utf-8''{}", urlencoding::encode(name))
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_names_are_quoted() {
        assert_eq!(content_disposition("Golden Sun.gba"), "attachment; filename=\"Golden Sun.gba\"");
    }

    #[test]
    fn non_ascii_names_are_percent_encoded() {
        assert_eq!(
            content_disposition("Pokémon.gba"),
            "attachment; filename*=utf-8''Pok%C3%A9mon.gba"
        );
        assert_eq!(content_disposition("say \"hi\".gba"), "attachment; filename*=utf-8''say%20%22hi%22.gba");
    }
}
