//! Normalized response contract
//!
//! Every dashboard-facing route answers with this shape:
//! ```json
//! {
//!     "success": true,
//!     "message": "OK",
//!     "data": { ... },
//!     "error": "optional technical detail",
//!     "timestamp": "2024-05-01T08:00:00.000Z",
//!     "fallback": true
//! }
//! ```
//! `data` is always present on the wire (possibly `null`); `fallback` is
//! only written when the payload is substituted sample/default data.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::util::now_iso;

/// Unified response structure returned to the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse<T> {
    /// Business-level success
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Payload; `None` serializes as `null`
    pub data: Option<T>,
    /// Technical detail for failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ISO-8601 UTC generation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Payload was substituted by the fallback policy
    #[serde(default, skip_serializing_if = "is_false")]
    pub fallback: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl<T> NormalizedResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "OK")
    }

    /// Create a successful response with custom message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: None,
            fallback: false,
        }
    }

    /// Create a failed response without payload
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: None,
            timestamp: None,
            fallback: false,
        }
    }

    /// Create a failed response from an [`AppError`]
    pub fn from_error(err: &AppError) -> Self {
        Self {
            error: err.detail.clone(),
            ..Self::failure(err.message.clone())
        }
    }

    /// Replace the payload
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Mark the payload as substituted
    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    /// Attach the generation timestamp (now, UTC)
    pub fn stamped(mut self) -> Self {
        self.timestamp = Some(now_iso());
        self
    }
}
