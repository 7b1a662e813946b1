//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use teamgate_core::TeamgateError;
use tracing::error;

/// Error returned by handlers; rendered as `{"detail": msg}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Internal(msg) => msg,
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

impl From<TeamgateError> for ApiError {
    fn from(err: TeamgateError) -> Self {
        match err {
            TeamgateError::Validation(msg) => ApiError::BadRequest(msg),
            TeamgateError::NotFound(msg) => ApiError::NotFound(msg),
            other => {
                error!("TeamgateError: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
