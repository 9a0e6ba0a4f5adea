//! HTTP status mapping for error codes
//!
//! Business failures answer 200 so the dashboard can render the upstream
//! message; only transport and system failures answer 500.

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::ValidationFailed | Self::InvalidRequest | Self::RequiredField => {
                StatusCode::BAD_REQUEST
            }

            Self::NotFound => StatusCode::NOT_FOUND,

            _ => match self.category() {
                ErrorCategory::Auth | ErrorCategory::Business => StatusCode::OK,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}
