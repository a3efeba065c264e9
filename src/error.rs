use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error;
use std::fmt;

use crate::catalog::CatalogError;

/// The primary error type for the HTTP layer.
///
/// Every variant renders as a JSON body of the shape `{"detail": "..."}` so
/// front-ends only ever have to look at one field.
#[derive(Debug)]
pub enum AppError {
    /// For internal server errors that are not expected to be handled by the client.
    Internal(anyhow::Error),
    /// For client errors due to malformed requests.
    BadRequest(String),
    /// For when a requested resource is not found.
    NotFound(String),
    /// A ROM passed the catalog check but could not be opened afterwards.
    RomMissing {
        /// The requested file name.
        name: String,
        /// Why opening the file failed.
        reason: String,
    },
    /// For when a client has sent too many requests in a given amount of time.
    RateLimited {
        /// The number of seconds to wait before retrying the request.
        retry_after_seconds: u64,
    },
    /// For errors related to I/O operations.
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::RomMissing { name, reason } => {
                write!(f, "ROM '{}' listed but unreadable: {}", name, reason)
            }
            AppError::RateLimited { retry_after_seconds } => {
                write!(f, "Rate limited. Retry after {} seconds", retry_after_seconds)
            }
            AppError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::RomMissing { name, reason } => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, rom = %name, "ROM listed but missing on disk: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error: ROM file missing".to_string(),
                )
            }
            AppError::RateLimited { retry_after_seconds } => {
                let mut res = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({
                        "detail": format!(
                            "Too many requests. Please retry after {} seconds",
                            retry_after_seconds
                        ),
                    })),
                )
                    .into_response();
                if let Ok(v) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                    res.headers_mut().insert(header::RETRY_AFTER, v);
                }
                return res;
            }
            AppError::IoError(msg) => {
                tracing::error!("I/O error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(format!("{}: {}", err.kind(), err))
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFound("Game not found".to_string()),
            CatalogError::Unreadable { name, source } => {
                AppError::RomMissing { name, reason: format!("{}: {}", source.kind(), source) }
            }
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::anyhow!("blocking task failed: {}", err))
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;
