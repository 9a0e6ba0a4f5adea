//! Monitoring dashboard data

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::AppError;

use super::validation::{MAX_ID_LEN, optional_text, query_params, require_text};
use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::samples::SampleSeed;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MonitorQuery {
    pub activity_id: Option<String>,
    /// `YYYY-MM-DD`, defaults to today
    pub date: Option<String>,
}

/// GET /api/monitor
pub async fn get_monitor_data(
    State(state): State<AppState>,
    query: Result<Query<MonitorQuery>, QueryRejection>,
) -> Result<ApiReply, ApiReply> {
    let query = query_params(query)?;
    let activity_id = require_text(query.activity_id.as_deref(), "activity_id", MAX_ID_LEN)?;
    let date = optional_text(query.date.as_deref(), "date", 10)?
        .map(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .map_err(|_| AppError::validation("date must be formatted as YYYY-MM-DD"))
        })
        .transpose()?;

    let anchor = date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let request = UpstreamRequest::new(Endpoint::GetMonitorData)
        .query("activity_id", &activity_id)
        .query("date", anchor.format("%Y-%m-%d").to_string());

    Ok(state
        .proxy
        .forward(request, SampleSeed::new(activity_id, anchor))
        .await)
}
