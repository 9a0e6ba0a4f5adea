//! Client error types

use thiserror::Error;

use crate::session::StoreError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered but could not reach the upstream (HTTP 5xx)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Business failure reported by the upstream (`success: false`)
    #[error("{message}")]
    Rejected { message: String },

    /// Input refused before any upstream call (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response did not match the envelope contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Another login is already running
    #[error("Another login is already in progress")]
    InFlight,

    /// Durable session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The upstream could not be reached, as opposed to refusing the request
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Unavailable(_))
    }

    /// Text suitable for the login form
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
