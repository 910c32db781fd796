use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hashlink_core::ShortenerError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Failures a handler reports to the client.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    /// Store or server fault. The message is logged, never sent.
    Internal(String),
}

impl AppError {
    /// Replaces the client-facing detail of a 4xx error.
    pub fn with_detail(self, detail: &str) -> Self {
        match self {
            AppError::BadRequest(_) => AppError::BadRequest(detail.to_string()),
            AppError::NotFound(_) => AppError::NotFound(detail.to_string()),
            internal @ AppError::Internal(_) => internal,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::InvalidInput(message) => AppError::BadRequest(message),
            ShortenerError::NotFound(message) => AppError::NotFound(message),
            other @ (ShortenerError::CollisionUnresolved(_) | ShortenerError::Storage(_)) => {
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            AppError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            AppError::Internal(message) => {
                error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_DETAIL.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
