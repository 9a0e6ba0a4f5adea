//! activity-server — admin backend in front of the legacy activity service
//!
//! - [`gateway`]: signed calls to the PHP upstream
//! - [`normalize`]: envelope parsing, success rules, payload extraction
//! - [`fallback`]: what a failed call turns into, per endpoint
//! - [`samples`]: deterministic placeholder data for dashboards
//! - [`api`]: the dashboard-facing JSON routes

pub mod api;
pub mod config;
pub mod fallback;
pub mod field_mapping;
pub mod gateway;
pub mod logger;
pub mod normalize;
pub mod proxy;
pub mod reply;
pub mod samples;
pub mod state;

pub use api::create_router;
pub use config::Config;
pub use reply::ApiReply;
pub use state::AppState;
