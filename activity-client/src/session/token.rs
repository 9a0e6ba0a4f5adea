//! Local decoding of the session token's claims
//!
//! Only the payload segment is read; the signature is the server's concern.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Claims the client looks at
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, epoch seconds
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub sub: Option<String>,
}

/// Decode the payload of a `header.payload.signature` token
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    // Some issuers keep the padding
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&payload).ok()
}

/// Whether the token must be treated as expired at `now` (epoch seconds)
///
/// Undecodable tokens count as expired. Tokens without `exp` do not
/// expire locally and are left to the server.
pub fn is_expired(token: &str, now: i64) -> bool {
    match decode_claims(token) {
        Some(claims) => claims.exp.is_some_and(|exp| exp <= now),
        None => true,
    }
}

/// Remaining lifetime, `None` when the token carries no `exp`
pub fn remaining(token: &str, now: i64) -> Option<Duration> {
    let exp = decode_claims(token)?.exp?;
    Some(Duration::from_secs(exp.saturating_sub(now).max(0) as u64))
}
