//! Typed error handling for the order service
//!
//! Every failure raised by the service is one of a small set of kinds, each
//! mapped to an HTTP status and a stable error code:
//!
//! - [`ApiError::BadRequest`]: invalid or unauthorized request. Also used for
//!   "not found" on reads and deletes, so callers cannot tell a missing
//!   record from one they may not see.
//! - [`ApiError::EntityNotFound`]: update target missing or id mismatch
//! - [`ApiError::OperationFailed`]: unexpected entity store failure
//! - [`ApiError::Unauthorized`]: caller identity could not be extracted
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get_by_id(&ctx, 42).await {
//!     Ok(order) => println!("Found: {:?}", order),
//!     Err(ApiError::BadRequest(message)) => println!("Rejected: {}", message),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The error type returned by every service operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Caller or request is invalid, or the target is not visible to the caller
    #[error("{0}")]
    BadRequest(String),

    /// Entity addressed by an update does not exist or does not match
    #[error("{0}")]
    EntityNotFound(String),

    /// Entity store failure, carrying only the underlying message
    #[error("{0}")]
    OperationFailed(String),

    /// Caller identity could not be established
    #[error("{0}")]
    Unauthorized(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn entity_not_found(message: impl Into<String>) -> Self {
        ApiError::EntityNotFound(message.into())
    }

    pub fn operation_failed(message: impl Into<String>) -> Self {
        ApiError::OperationFailed(message.into())
    }

    /// The human-readable message carried by this error
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(message)
            | ApiError::EntityNotFound(message)
            | ApiError::OperationFailed(message)
            | ApiError::Unauthorized(message) => message,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::EntityNotFound(_) => "ENTITY_NOT_FOUND",
            ApiError::OperationFailed(_) => "OPERATION_FAILED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.message().to_string(),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;
