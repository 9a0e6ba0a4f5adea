//! Activity configuration read/save

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;

use super::validation::{MAX_ID_LEN, json_body, query_params, require_text};
use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::samples::SampleSeed;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigQuery {
    pub activity_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SaveConfigBody {
    pub activity_id: Option<String>,
    pub config: Option<Value>,
}

/// GET /api/activity/config
pub async fn get_config(
    State(state): State<AppState>,
    query: Result<Query<ConfigQuery>, QueryRejection>,
) -> Result<ApiReply, ApiReply> {
    let query = query_params(query)?;
    let activity_id = require_text(query.activity_id.as_deref(), "activity_id", MAX_ID_LEN)?;

    let request = UpstreamRequest::new(Endpoint::GetConfig).query("activity_id", &activity_id);
    Ok(state
        .proxy
        .forward(request, SampleSeed::today(activity_id))
        .await)
}

/// POST /api/activity/config
pub async fn save_config(
    State(state): State<AppState>,
    body: Result<Json<SaveConfigBody>, JsonRejection>,
) -> Result<ApiReply, ApiReply> {
    let body = json_body(body)?;
    let activity_id = require_text(body.activity_id.as_deref(), "activity_id", MAX_ID_LEN)?;
    let config = match body.config {
        Some(config @ Value::Object(_)) => config,
        Some(_) => return Err(AppError::validation("config must be an object").into()),
        None => return Err(AppError::required_field("config").into()),
    };

    let request = UpstreamRequest::new(Endpoint::SaveConfig)
        .with_fields(json!({ "activity_id": activity_id, "config": config }));
    let reply = state
        .proxy
        .forward(request, SampleSeed::today(activity_id.as_str()))
        .await;

    if reply.body.success {
        tracing::info!(%activity_id, "Activity configuration saved");
        return Ok(reply.with_message("Configuration saved"));
    }
    Ok(reply)
}
