//! Route guard for protected views

use super::state::{AuthPhase, AuthSnapshot};

pub const LOGIN_PATH: &str = "/login";

/// What a protected view should do for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is still being resolved; render nothing yet
    Pending,
    Allow,
    /// Send to the login view, coming back to `return_to` afterwards
    Redirect { to: String, return_to: String },
}

pub fn guard(snapshot: &AuthSnapshot, path: &str) -> GuardDecision {
    match snapshot.phase() {
        AuthPhase::Loading => GuardDecision::Pending,
        AuthPhase::Authenticated => GuardDecision::Allow,
        AuthPhase::Anonymous => GuardDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            return_to: path.to_string(),
        },
    }
}
