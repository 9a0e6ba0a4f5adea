//! Field-name mapping and API discovery

use axum::extract::State;

use crate::gateway::{Endpoint, UpstreamRequest};
use crate::reply::ApiReply;
use crate::samples::SampleSeed;
use crate::state::AppState;

/// GET /api/field-mapping
pub async fn field_mapping(State(state): State<AppState>) -> ApiReply {
    state
        .proxy
        .forward(
            UpstreamRequest::new(Endpoint::GetFieldMapping),
            SampleSeed::today("field-mapping"),
        )
        .await
}

/// GET /api/discovery
pub async fn discovery(State(state): State<AppState>) -> ApiReply {
    state
        .proxy
        .forward(
            UpstreamRequest::new(Endpoint::DiscoverApis),
            SampleSeed::today("discovery"),
        )
        .await
}
