//! Read-only session snapshot shared with consumers

use serde::{Deserialize, Serialize};

/// The signed-in admin as kept on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub username: String,
    /// ISO-8601 UTC
    pub login_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Coarse state of the session machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Anonymous,
    Loading,
    Authenticated,
}

/// Current session as seen by consumers
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthSnapshot {
    /// Startup state: nothing known yet
    pub fn initializing() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn anonymous(error: Option<String>) -> Self {
        Self {
            error,
            ..Self::default()
        }
    }

    pub fn authenticated(token: String, user: Option<SessionUser>) -> Self {
        Self {
            is_authenticated: true,
            user,
            token: Some(token),
            is_loading: false,
            error: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }
}
