//! Gateway error types and their HTTP mapping.
//!
//! | Cause | Status | Code |
//! |-------|--------|------|
//! | Queue at capacity | 400 | `queue_full` |
//! | Bad path, query or body | 400 | `invalid_request` |
//! | Body over limit | 413 | `invalid_request` |
//! | Backing store failure | 503 | `backend_unavailable` |
//! | Anything else | 500 | `internal` |

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cq_02_queue_store::QueueError;
use shared_types::{ErrorBody, ErrorCode, ParseEventIdError, QueueKeyError};
use std::fmt;

/// API error: HTTP status plus the JSON body sent to the caller.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Queue is at its configured maximum length
    pub fn queue_full(capacity: usize) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::QueueFull,
            format!("Queue full: {} events", capacity),
        )
    }

    /// Malformed path, query or body
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRequest,
            format!("Invalid request: {}", details.into()),
        )
    }

    /// Body larger than the configured limit
    pub fn payload_too_large(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::InvalidRequest,
            format!("Payload too large: {}", details.into()),
        )
    }

    /// Backing store unreachable or misbehaving
    pub fn backend_unavailable(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::BackendUnavailable,
            format!("Backend unavailable: {}", details.into()),
        )
    }

    /// Internal error
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            format!("Internal error: {}", details.into()),
        )
    }

    /// Wire body for this error
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code,
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = self.status.as_u16(), message = %self.message, "request failed");
        }
        (self.status, Json(self.body())).into_response()
    }
}

// Conversions from common error types

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::QueueFull { capacity } => ApiError::queue_full(capacity),
            QueueError::Backend(e) => ApiError::backend_unavailable(e.to_string()),
        }
    }
}

impl From<QueueKeyError> for ApiError {
    fn from(e: QueueKeyError) -> Self {
        ApiError::invalid_request(e.to_string())
    }
}

impl From<ParseEventIdError> for ApiError {
    fn from(e: ParseEventIdError) -> Self {
        ApiError::invalid_request(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(e.body_text())
        } else {
            ApiError::invalid_request(e.body_text())
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::invalid_request(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::invalid_request(e.body_text())
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Server lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server loop failed
    #[error("server error: {0}")]
    Serve(String),
}
