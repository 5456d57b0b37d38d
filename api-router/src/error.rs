use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::AppError;
use thiserror::Error;

/// HTTP-facing error. Bodies are the plain-text message; clients treat them
/// as opaque.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound { ref source, .. } => {
                tracing::debug!(cause = %source, "{err}");
                Self::NotFound(err.to_string())
            }
            AppError::Validation(msg) => Self::ValidationError(msg),
            _ => {
                tracing::error!("Internal error: {:?}", err);
                Self::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InternalError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            Self::ValidationError(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, message).into_response()
    }
}
