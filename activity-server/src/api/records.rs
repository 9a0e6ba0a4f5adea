//! Activity record feeds

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::ActivityKind;

use super::validation::{MAX_ID_LEN, optional_text, paging, query_params};
use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::samples::SampleSeed;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub activity_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/activities/{kind}/records
pub async fn list_records(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    query: Result<Query<RecordsQuery>, QueryRejection>,
) -> Result<ApiReply, ApiReply> {
    let kind: ActivityKind = kind
        .parse()
        .map_err(|e: shared::models::UnknownActivityKind| {
            AppError::with_message(ErrorCode::InvalidRequest, e.to_string())
        })?;
    let query = query_params(query)?;
    let activity_id = optional_text(query.activity_id.as_deref(), "activity_id", MAX_ID_LEN)?;
    let (page, page_size) = paging(query.page, query.page_size)?;

    let request = UpstreamRequest::new(Endpoint::for_activity(kind))
        .query_opt("activity_id", activity_id.as_deref())
        .query("page", page.to_string())
        .query("page_size", page_size.to_string());

    let seed_key = activity_id.unwrap_or_else(|| kind.slug().to_string());
    Ok(state.proxy.forward(request, SampleSeed::today(seed_key)).await)
}
