use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine-readable failure categories shared with the backend.
/// Unknown wire codes collapse to `UnknownError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    TimeoutError,
    ServerError,
    ValidationError,
    NotFound,
    Unauthorized,
    #[serde(other)]
    UnknownError,
}

/// Error body returned by the backend on a non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

/// Normalized failure for one chat exchange. Every transport-internal
/// failure mode is mapped into this shape before it reaches the session
/// controller.
#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}")]
pub struct ChatApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ChatApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }
}

impl From<ApiErrorBody> for ChatApiError {
    fn from(body: ApiErrorBody) -> Self {
        Self {
            code: body.code,
            message: body.error,
            details: body.details,
        }
    }
}
