//! Unified error system for the activity admin
//!
//! - [`ErrorCode`]: standardized codes, grouped by range
//! - [`ErrorCategory`]: validation / auth / business / transport / system
//! - [`AppError`]: code + message + optional technical detail
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::TimeoutError).with_detail("30000ms elapsed");
//! assert_eq!(err.http_status().as_u16(), 500);
//!
//! let err = AppError::rejected("activity not found");
//! assert_eq!(err.http_status().as_u16(), 200);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
