//! Admin session: state machine, storage, periodic check, route guard

mod guard;
mod manager;
mod monitor;
mod state;
pub mod store;
pub mod token;

pub use guard::{GuardDecision, LOGIN_PATH, guard};
pub use manager::{AuthSession, SessionCheck, VerifyOutcome};
pub use monitor::SessionMonitor;
pub use state::{AuthPhase, AuthSnapshot, SessionUser};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
