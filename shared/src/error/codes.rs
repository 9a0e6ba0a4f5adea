//! Unified error codes for the activity admin
//!
//! Error codes are organized by range:
//! - 0xxx: General / input validation
//! - 1xxx: Authentication
//! - 2xxx: Upstream business failures
//! - 9xxx: System and transport failures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so the dashboard and the session client
/// can branch on it without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Upstream business ====================
    /// Upstream answered with a non-success `code`
    UpstreamRejected = 2001,
    /// Upstream answered with a success code but an unusable payload shape
    UpstreamShapeMismatch = 2002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9005,

    // ==================== 91xx: Transport ====================
    /// Network error talking to the upstream
    NetworkError = 9101,
    /// Upstream call exceeded its timeout
    TimeoutError = 9102,
    /// Upstream answered with a non-2xx HTTP status
    UpstreamStatus = 9103,
    /// Upstream body was not valid JSON
    MalformedUpstream = 9104,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",

            ErrorCode::UpstreamRejected => "Upstream rejected the request",
            ErrorCode::UpstreamShapeMismatch => "Upstream returned an unexpected payload",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",

            ErrorCode::NetworkError => "Upstream service unavailable",
            ErrorCode::TimeoutError => "Upstream service timed out",
            ErrorCode::UpstreamStatus => "Upstream service returned an error status",
            ErrorCode::MalformedUpstream => "Upstream returned malformed data",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),

            2001 => Ok(ErrorCode::UpstreamRejected),
            2002 => Ok(ErrorCode::UpstreamShapeMismatch),

            9001 => Ok(ErrorCode::InternalError),
            9005 => Ok(ErrorCode::ConfigError),

            9101 => Ok(ErrorCode::NetworkError),
            9102 => Ok(ErrorCode::TimeoutError),
            9103 => Ok(ErrorCode::UpstreamStatus),
            9104 => Ok(ErrorCode::MalformedUpstream),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
