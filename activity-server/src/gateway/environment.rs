//! Upstream environments and their base-URL / entry-path tables

use std::fmt;
use std::str::FromStr;

/// Deployment environment of the legacy upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Test,
    Production,
}

/// Where the PHP entry script lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    /// Scheme + host (+ port), no trailing slash
    pub base_url: String,
    /// Path of the entry script, e.g. `/index.php`
    pub entry_path: String,
}

impl UpstreamTarget {
    pub fn new(base_url: impl Into<String>, entry_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            entry_path: entry_path.into(),
        }
    }

    /// Full entry URL without query string
    pub fn entry_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.entry_path.starts_with('/') {
            format!("{base}{}", self.entry_path)
        } else {
            format!("{base}/{}", self.entry_path)
        }
    }
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "production",
        }
    }

    /// Default target for this environment
    pub fn default_target(&self) -> UpstreamTarget {
        match self {
            Self::Test => UpstreamTarget::new("http://test-activity.live.internal", "/activity/index.php"),
            Self::Production => UpstreamTarget::new("https://activity.live.internal", "/index.php"),
        }
    }

    /// Value of the `debug` query parameter
    pub fn default_debug(&self) -> &'static str {
        match self {
            Self::Test => "1",
            Self::Production => "0",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "test" | "testing" | "development" | "dev" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("Development".parse::<Environment>(), Ok(Environment::Test));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_entry_url_joins_slashes() {
        let target = UpstreamTarget::new("http://127.0.0.1:9000/", "index.php");
        assert_eq!(target.entry_url(), "http://127.0.0.1:9000/index.php");

        let target = UpstreamTarget::new("http://127.0.0.1:9000", "/api/index.php");
        assert_eq!(target.entry_url(), "http://127.0.0.1:9000/api/index.php");
    }

    #[test]
    fn test_tables_differ_per_environment() {
        assert_ne!(
            Environment::Test.default_target(),
            Environment::Production.default_target()
        );
        assert_eq!(Environment::Production.default_debug(), "0");
    }
}
