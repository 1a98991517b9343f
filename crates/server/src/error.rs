//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type mapped onto HTTP status codes with
//! JSON `{"error": "..."}` bodies. All route handlers should return
//! `Result<T, AppError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed (validation, conflict, storage).
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Catalog(CatalogError::Store(err))
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
                CatalogError::NeedsReplacement(_) | CatalogError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Catalog(CatalogError::Store(_)) | Self::Internal(_)
        ) {
            tracing::error!(error = %self, "request error");
        }

        let status = self.status();

        // Don't expose storage details to clients.
        let message = match &self {
            Self::Catalog(CatalogError::Store(_)) | Self::Internal(_) => {
                "Erreur interne du serveur.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
