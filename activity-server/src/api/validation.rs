//! Input validation helpers
//!
//! Every check runs before any upstream call; failures answer 400.

use axum::Json;
use axum::body::Bytes;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Activity ids, cache keys' owners, scopes
pub const MAX_ID_LEN: usize = 64;

/// Admin usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (forwarded as-is)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Session tokens
pub const MAX_TOKEN_LEN: usize = 4096;

/// Cache keys
pub const MAX_KEY_LEN: usize = 256;

/// Largest accepted page size for record feeds
pub const MAX_PAGE_SIZE: u32 = 200;

// ── Field helpers ───────────────────────────────────────────────────

/// A required string: present, non-blank and within the length limit.
/// Returns the trimmed value.
pub fn require_text(value: Option<&str>, field: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(value.to_string())
}

/// An optional string: blank counts as absent.
pub fn optional_text(
    value: Option<&str>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => require_text(Some(v), field, max_len).map(Some),
        None => Ok(None),
    }
}

/// Validate paging input, filling defaults
pub fn paging(page: Option<u32>, page_size: Option<u32>) -> Result<(u32, u32), AppError> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(20);
    if page == 0 {
        return Err(AppError::validation("page must be at least 1"));
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(AppError::validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok((page, page_size))
}

// ── Extractor rejections ────────────────────────────────────────────

/// Unwrap a JSON body, turning extractor rejections into 400s
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text()))
}

/// Unwrap a query string, turning extractor rejections into 400s
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text()))
}

/// A JSON body that may be omitted entirely
pub fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Invalid JSON body: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_missing_and_blank() {
        let err = require_text(None, "username", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "Missing required field: username");

        let err = require_text(Some("   "), "username", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[test]
    fn test_require_text_trims_and_limits() {
        assert_eq!(require_text(Some(" admin "), "username", 10).unwrap(), "admin");
        let err = require_text(Some("abcdefghijk"), "username", 10).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some(""), "scope", 10).unwrap(), None);
        assert_eq!(optional_text(Some("all"), "scope", 10).unwrap(), Some("all".into()));
        assert!(optional_text(Some("x".repeat(11).as_str()), "scope", 10).is_err());
    }

    #[test]
    fn test_paging_bounds() {
        assert_eq!(paging(None, None).unwrap(), (1, 20));
        assert!(paging(Some(0), None).is_err());
        assert!(paging(None, Some(MAX_PAGE_SIZE + 1)).is_err());
    }

    #[test]
    fn test_optional_json_empty_body() {
        #[derive(Debug, Default, serde::Deserialize, PartialEq)]
        struct Body {
            scope: Option<String>,
        }
        assert_eq!(optional_json::<Body>(&Bytes::new()).unwrap(), Body::default());
        assert_eq!(
            optional_json::<Body>(&Bytes::from_static(br#"{"scope":"all"}"#)).unwrap(),
            Body {
                scope: Some("all".into())
            }
        );
        assert!(optional_json::<Body>(&Bytes::from_static(b"{")).is_err());
    }
}
