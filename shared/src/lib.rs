//! Shared types for the activity admin
//!
//! Wire contract used by both `activity-server` and `activity-client`:
//! the normalized response envelope, error codes, auth DTOs and a few
//! dashboard models.

pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use response::NormalizedResponse;
