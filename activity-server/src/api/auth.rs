//! Login and token verification

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};
use shared::client::{LoginRequest, LoginResponse, UserInfo, VerifyRequest, VerifyResponse};
use shared::error::{AppError, ErrorCategory, ErrorCode};

use super::validation::{MAX_PASSWORD_LEN, MAX_TOKEN_LEN, MAX_USERNAME_LEN, json_body, require_text};
use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::state::AppState;

const AUTH_UNAVAILABLE: &str = "Authentication service unavailable";

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiReply, ApiReply> {
    let req = json_body(body)?;
    let username = require_text(Some(req.username.as_str()), "username", MAX_USERNAME_LEN)?;
    // Passwords are not trimmed
    if req.password.is_empty() {
        return Err(AppError::required_field("password").into());
    }
    if req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("password is too long").into());
    }

    let request = UpstreamRequest::new(Endpoint::Login)
        .form([("username", username.as_str()), ("password", req.password.as_str())]);

    let payload = state.proxy.fetch(request).await.map_err(auth_failure)?;
    let response = login_response(&payload, &username)?;
    tracing::info!(username = %response.user.username, "Admin logged in");

    Ok(ApiReply::ok_with_message(json!(response), "Login successful"))
}

/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<ApiReply, ApiReply> {
    let req = json_body(body)?;
    let token = require_text(Some(req.token.as_str()), "token", MAX_TOKEN_LEN)?;

    let request = UpstreamRequest::new(Endpoint::VerifyToken).form([("token", token)]);
    let payload = state.proxy.fetch(request).await.map_err(auth_failure)?;

    let response = VerifyResponse {
        valid: payload.get("valid").and_then(Value::as_bool).unwrap_or(true),
        user: user_from(&payload),
    };
    if !response.valid {
        let mut reply = ApiReply::error(&AppError::new(ErrorCode::TokenInvalid));
        reply.body.data = Some(json!(response));
        return Err(reply);
    }
    Ok(ApiReply::ok_with_message(json!(response), "Token is valid"))
}

/// Transport failures get a fixed message; business failures keep the upstream text
fn auth_failure(err: AppError) -> ApiReply {
    let reply = ApiReply::error(&err);
    if err.code.category() == ErrorCategory::Transport {
        reply.with_message(AUTH_UNAVAILABLE)
    } else {
        reply
    }
}

fn login_response(payload: &Value, username: &str) -> Result<LoginResponse, AppError> {
    let token = ["token", "access_token"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UpstreamShapeMismatch,
                "Login response did not include a token",
            )
        })?;

    let user = user_from(payload).unwrap_or_else(|| UserInfo {
        username: username.to_string(),
        nickname: payload
            .get("nickname")
            .and_then(Value::as_str)
            .map(str::to_string),
        role: payload.get("role").and_then(Value::as_str).map(str::to_string),
    });

    Ok(LoginResponse {
        token: token.to_string(),
        user,
    })
}

fn user_from(payload: &Value) -> Option<UserInfo> {
    ["user", "userInfo", "admin"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find_map(|v| serde_json::from_value(v.clone()).ok())
}
