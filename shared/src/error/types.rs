//! Error type carried across the service boundary

use super::codes::ErrorCode;
use http::StatusCode;
use thiserror::Error;

/// Application error with structured error code
///
/// - `code`: classification, drives the HTTP status
/// - `message`: human-readable, shown by the dashboard as-is
/// - `detail`: optional technical detail, surfaced as the envelope's `error`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Technical detail (never a stack trace)
    pub detail: Option<String>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            detail: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach a technical detail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a missing-field error
    pub fn required_field(field: &str) -> Self {
        Self::with_message(
            ErrorCode::RequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Create an upstream business rejection carrying the upstream message
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UpstreamRejected, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
