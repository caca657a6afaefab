use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("user resolution error: {0}")]
    UserResolution(String),
    #[error("priority '{0}' is not valid")]
    InvalidPriority(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Validation failures carry their message to the caller; every other kind
/// is logged server-side and surfaced as a bare 500 so callers cannot
/// distinguish backend causes from the response alone.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            other => {
                error!("request failed: {other}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
