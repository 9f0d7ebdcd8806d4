//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Catalog errors.
///
/// The first four kinds are caller errors and always name the offending
/// parameter in their message. Database and Internal failures are logged
/// with request context and surfaced opaquely.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("invalid sort: {0}")]
    InvalidSort(String),

    #[error("invalid parameter: {0}")]
    InvalidProperty(String),

    #[error("no products match the requested filters")]
    NoMatchingProducts,

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPagination(_) | Self::InvalidSort(_) | Self::InvalidProperty(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NoMatchingProducts | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;
