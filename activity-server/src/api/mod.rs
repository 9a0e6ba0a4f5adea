//! Dashboard-facing routes
//!
//! Every handler answers with an [`ApiReply`]; nothing reaches axum's own
//! error responses.

pub mod activity_config;
pub mod auth;
pub mod cache;
pub mod health;
pub mod monitor;
pub mod records;
pub mod system;
pub mod validation;

use axum::Router;
use axum::routing::{get, post};
use shared::error::{AppError, ErrorCode};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::reply::ApiReply;
use crate::state::AppState;

/// Create the router
pub fn create_router(state: AppState) -> Router {
    let auth = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", post(auth::verify));

    let activity = Router::new()
        .route(
            "/api/activity/config",
            get(activity_config::get_config).post(activity_config::save_config),
        )
        .route("/api/monitor", get(monitor::get_monitor_data))
        .route("/api/activities/{kind}/records", get(records::list_records));

    let system = Router::new()
        .route("/api/cache/reload", post(cache::reload))
        .route("/api/cache/delete", post(cache::delete))
        .route("/api/field-mapping", get(system::field_mapping))
        .route("/api/discovery", get(system::discovery));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth)
        .merge(activity)
        .merge(system)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn not_found() -> ApiReply {
    ApiReply::error(&AppError::with_message(ErrorCode::NotFound, "Route not found"))
}
