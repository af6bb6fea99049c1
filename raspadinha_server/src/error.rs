use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use raspadinha_core::GameError;
use raspadinha_shared::{ApiError, ErrorBody};
use thiserror::Error;
use tracing::error;

/// Handler error: wraps the shared `ApiError` so it can become a response.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct AppError(#[from] pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<GameError> for AppError {
    fn from(e: GameError) -> Self {
        error!(error = %e, "game configuration rejected");
        match e {
            GameError::InvalidConfiguration(reason) => AppError(ApiError::Configuration(reason)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        error!(error = %e, "database error");
        AppError(ApiError::Internal)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = %e, "internal error");
        AppError(ApiError::Internal)
    }
}

pub type AppResult<T> = Result<T, AppError>;
