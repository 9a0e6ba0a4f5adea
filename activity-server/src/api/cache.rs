//! Upstream cache maintenance

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use super::validation::{MAX_ID_LEN, MAX_KEY_LEN, json_body, optional_json, optional_text, require_text};
use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::samples::SampleSeed;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReloadBody {
    pub scope: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteBody {
    pub key: Option<String>,
}

/// POST /api/cache/reload
pub async fn reload(State(state): State<AppState>, body: Bytes) -> Result<ApiReply, ApiReply> {
    let body: ReloadBody = optional_json(&body)?;
    let scope = optional_text(body.scope.as_deref(), "scope", MAX_ID_LEN)?;

    let fields: Vec<(&str, String)> = scope.iter().map(|s| ("scope", s.clone())).collect();
    let request = UpstreamRequest::new(Endpoint::ReloadCache).form(fields);
    let reply = state.proxy.forward(request, SampleSeed::today("cache")).await;

    if reply.body.success {
        tracing::info!(scope = ?scope, "Upstream cache reloaded");
        return Ok(reply.with_message("Cache reloaded"));
    }
    Ok(reply)
}

/// POST /api/cache/delete
pub async fn delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteBody>, JsonRejection>,
) -> Result<ApiReply, ApiReply> {
    let body = json_body(body)?;
    let key = require_text(body.key.as_deref(), "key", MAX_KEY_LEN)?;

    let request = UpstreamRequest::new(Endpoint::DeleteCacheEntry).form([("key", key.as_str())]);
    let reply = state.proxy.forward(request, SampleSeed::today("cache")).await;

    if reply.body.success {
        tracing::info!(%key, "Upstream cache entry deleted");
        return Ok(reply.with_message("Cache entry deleted"));
    }
    Ok(reply)
}
