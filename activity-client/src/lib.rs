//! activity-client — session side of the activity admin
//!
//! Owns the admin's authentication state: login, token re-validation,
//! expiry-driven logout, durable storage of the session and the route
//! guard consulted before protected views render. Also caches the
//! field-name mapping with a TTL.

pub mod config;
pub mod error;
pub mod field_mapping;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use field_mapping::FieldMappingCache;
pub use http::{AdminHttpClient, AuthApi, FetchedMapping, FieldMappingApi};
pub use session::{
    AuthPhase, AuthSession, AuthSnapshot, FileSessionStore, GuardDecision, MemorySessionStore,
    SessionCheck, SessionMonitor, SessionStore, SessionUser, VerifyOutcome, guard,
};
