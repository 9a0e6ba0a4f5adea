//! Boundary-B reply: HTTP status plus the normalized envelope

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::Value;
use shared::error::{AppError, ErrorCategory};
use shared::response::NormalizedResponse;

/// What every route handler answers with
///
/// Always stamped with a generation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: NormalizedResponse<Value>,
}

impl ApiReply {
    pub fn ok(data: Value) -> Self {
        Self::ok_with_message(data, "OK")
    }

    pub fn ok_with_message(data: Value, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: NormalizedResponse::success_with_message(data, message).stamped(),
        }
    }

    /// Substituted payload reported as success
    pub fn fallback(data: Value, message: impl Into<String>, err: &AppError) -> Self {
        let mut body = NormalizedResponse::success_with_message(data, message)
            .as_fallback()
            .stamped();
        body.error = Some(err.detail.clone().unwrap_or_else(|| err.message.clone()));
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// Failure with `data: null`, status taken from the error code
    pub fn error(err: &AppError) -> Self {
        if matches!(
            err.code.category(),
            ErrorCategory::System | ErrorCategory::Transport
        ) {
            tracing::error!(code = %err.code, message = %err.message, detail = ?err.detail, "Request failed");
        }
        Self {
            status: err.http_status(),
            body: NormalizedResponse::from_error(err).stamped(),
        }
    }

    /// Failure carrying a documented default payload
    pub fn error_with_data(err: &AppError, data: Value) -> Self {
        let mut reply = Self::error(err);
        reply.body = reply.body.with_data(data).as_fallback();
        reply
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.body.message = message.into();
        self
    }
}

impl From<AppError> for ApiReply {
    fn from(err: AppError) -> Self {
        Self::error(&err)
    }
}

impl IntoResponse for ApiReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
