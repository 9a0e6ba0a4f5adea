//! Dashboard models shared by server and client

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw backend field name -> human label
pub type FieldNameMapping = BTreeMap<String, String>;

/// Promotional activity families run by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    SignIn,
    Lottery,
    Tasks,
    Recharge,
    Festival,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::SignIn,
        ActivityKind::Lottery,
        ActivityKind::Tasks,
        ActivityKind::Recharge,
        ActivityKind::Festival,
    ];

    /// URL slug, e.g. `sign-in`
    pub fn slug(&self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::Lottery => "lottery",
            Self::Tasks => "tasks",
            Self::Recharge => "recharge",
            Self::Festival => "festival",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Unknown activity slug
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported activity kind: {0}")]
pub struct UnknownActivityKind(pub String);

impl FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| UnknownActivityKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for kind in ActivityKind::ALL {
            assert_eq!(kind.slug().parse::<ActivityKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_slug() {
        let err = "bingo".parse::<ActivityKind>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported activity kind: bingo");
    }

    #[test]
    fn test_serde_matches_slug() {
        let json = serde_json::to_string(&ActivityKind::SignIn).unwrap();
        assert_eq!(json, "\"sign-in\"");
    }
}
