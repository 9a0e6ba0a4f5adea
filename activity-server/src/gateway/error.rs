//! Transport failures of the gateway

use std::time::Duration;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Transport-level failure of one upstream call
///
/// The gateway never looks at the envelope, so nothing in here is a
/// business failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let code = match &err {
            GatewayError::Timeout(_) => ErrorCode::TimeoutError,
            GatewayError::Network(e) if e.is_timeout() => ErrorCode::TimeoutError,
            GatewayError::Network(_) => ErrorCode::NetworkError,
            GatewayError::Status(_) => ErrorCode::UpstreamStatus,
            GatewayError::InvalidUrl(_) => ErrorCode::ConfigError,
        };
        AppError::new(code).with_detail(err.to_string())
    }
}
