//! Server configuration

use std::time::Duration;

use crate::gateway::{Environment, GatewaySettings, SignatureScheme, UpstreamTarget};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Activity admin server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// `test` | `production`; selects the upstream URL table
    pub environment: Environment,
    /// HTTP listen port
    pub http_port: u16,
    /// Upstream addressing, credentials and signing
    pub gateway: GatewaySettings,
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret: must be set and non-empty outside the test environment.
    fn require_secret(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: Environment,
    ) -> Result<String, BoxError> {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment.is_production() {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment.is_production() {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Optional numeric variable; present but unparsable is an error
    fn parse_var<T>(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        default: T,
    ) -> Result<T, BoxError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e| format!("{name}={v:?} is not a valid number: {e}").into()),
            None => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment: Environment = match lookup("ENVIRONMENT") {
            Some(v) => v.parse()?,
            None => Environment::default(),
        };

        let defaults = environment.default_target();
        let target = UpstreamTarget::new(
            lookup("UPSTREAM_BASE_URL")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.base_url),
            lookup("UPSTREAM_ENTRY_PATH")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.entry_path),
        );

        let timeout_ms: u64 = Self::parse_var(&lookup, "UPSTREAM_TIMEOUT_MS", 30_000)?;
        if timeout_ms == 0 {
            return Err("UPSTREAM_TIMEOUT_MS must be greater than 0".into());
        }

        let scheme: SignatureScheme = match lookup("SIGNATURE_SCHEME") {
            Some(v) => v.parse()?,
            None => SignatureScheme::default(),
        };

        let gateway = GatewaySettings {
            environment,
            target,
            uid: Self::require_secret(&lookup, "UPSTREAM_UID", environment)?,
            auth: Self::require_secret(&lookup, "UPSTREAM_AUTH", environment)?,
            password: Self::require_secret(&lookup, "UPSTREAM_PASSWORD", environment)?,
            debug: lookup("UPSTREAM_DEBUG")
                .unwrap_or_else(|| environment.default_debug().to_string()),
            secret: Self::require_secret(&lookup, "UPSTREAM_SECRET", environment)?,
            client_id: lookup("UPSTREAM_CLIENT_ID").unwrap_or_else(|| "activity-admin".into()),
            timeout: Duration::from_millis(timeout_ms),
            scheme,
        };

        Ok(Self {
            environment,
            http_port: Self::parse_var(&lookup, "HTTP_PORT", 3001)?,
            gateway,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: lookup("LOG_JSON")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults_in_test_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.http_port, 3001);
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
        assert_eq!(config.gateway.debug, "1");
        assert_eq!(config.gateway.client_id, "activity-admin");
        assert_eq!(config.gateway.target, Environment::Test.default_target());
        assert!(config.gateway.secret.starts_with("dev-"));
        assert!(!config.log_json);
    }

    #[test]
    fn test_production_requires_secrets() {
        let err = load(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_UID"));
    }

    #[test]
    fn test_production_rejects_empty_secret() {
        let err = load(&[
            ("ENVIRONMENT", "production"),
            ("UPSTREAM_UID", "1"),
            ("UPSTREAM_AUTH", "a"),
            ("UPSTREAM_PASSWORD", "p"),
            ("UPSTREAM_SECRET", ""),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ENVIRONMENT", "production"),
            ("UPSTREAM_UID", "1"),
            ("UPSTREAM_AUTH", "a"),
            ("UPSTREAM_PASSWORD", "p"),
            ("UPSTREAM_SECRET", "s"),
            ("UPSTREAM_BASE_URL", "http://127.0.0.1:9000"),
            ("UPSTREAM_TIMEOUT_MS", "500"),
            ("SIGNATURE_SCHEME", "hmac"),
            ("HTTP_PORT", "8080"),
            ("LOG_JSON", "true"),
        ])
        .unwrap();
        assert_eq!(config.gateway.target.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.gateway.target.entry_path, "/index.php");
        assert_eq!(config.gateway.timeout, Duration::from_millis(500));
        assert_eq!(config.gateway.scheme, SignatureScheme::Hmac);
        assert_eq!(config.gateway.debug, "0");
        assert_eq!(config.http_port, 8080);
        assert!(config.log_json);
    }

    #[test]
    fn test_unparsable_numbers_are_errors() {
        let err = load(&[("UPSTREAM_TIMEOUT_MS", "30s")]).unwrap_err();
        assert!(err.to_string().contains("UPSTREAM_TIMEOUT_MS"));

        assert!(load(&[("UPSTREAM_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("HTTP_PORT", "70000")]).is_err());

        // Blank counts as unset
        let config = load(&[("UPSTREAM_TIMEOUT_MS", "")]).unwrap();
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_environment_is_error() {
        assert!(load(&[("ENVIRONMENT", "staging")]).is_err());
    }
}
