use std::path::PathBuf;
use std::time::Duration;

use catalog_gateway::GatewayConfig;

/// Errors raised while reading console configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not valid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL of the remote API.
    pub api_base: String,
    /// Catalog endpoint relative to `api_base`.
    pub catalog_endpoint: String,
    /// Token supplied directly; takes precedence over the session file.
    pub token: Option<String>,
    /// Default login email.
    pub admin_email: Option<String>,
    /// Where `login` stores the session between invocations.
    pub session_file: PathBuf,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                        | Default              |
    /// |--------------------------------|----------------------|
    /// | `CATALOG_API_BASE`             | required             |
    /// | `CATALOG_ENDPOINT`             | `list.php`           |
    /// | `CATALOG_TOKEN`                | unset                |
    /// | `CATALOG_ADMIN_EMAIL`          | unset                |
    /// | `CATALOG_SESSION_FILE`         | `.catalog-session`   |
    /// | `CATALOG_REQUEST_TIMEOUT_SECS` | unset (no timeout)   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base = var("CATALOG_API_BASE").ok_or(ConfigError::Missing("CATALOG_API_BASE"))?;

        let request_timeout = match var("CATALOG_REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(ConfigError::Invalid {
                        name: "CATALOG_REQUEST_TIMEOUT_SECS",
                        value: raw,
                    })
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
            },
        };

        Ok(Self {
            api_base,
            catalog_endpoint: var("CATALOG_ENDPOINT").unwrap_or_else(|| "list.php".into()),
            token: var("CATALOG_TOKEN"),
            admin_email: var("CATALOG_ADMIN_EMAIL"),
            session_file: var("CATALOG_SESSION_FILE")
                .unwrap_or_else(|| ".catalog-session".into())
                .into(),
            request_timeout,
        })
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(&self.api_base)
            .with_catalog_endpoint(&self.catalog_endpoint)
            .with_request_timeout(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConsoleConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("CATALOG_API_BASE", "http://localhost/api")]).unwrap();
        assert_eq!(config.catalog_endpoint, "list.php");
        assert_eq!(config.session_file, PathBuf::from(".catalog-session"));
        assert!(config.token.is_none());
        assert!(config.request_timeout.is_none());
        assert_eq!(
            config.gateway_config().url(&config.catalog_endpoint),
            "http://localhost/api/list.php"
        );
    }

    #[test]
    fn base_url_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("CATALOG_API_BASE")));
        assert_matches!(
            load(&[("CATALOG_API_BASE", "   ")]),
            Err(ConfigError::Missing(_))
        );
    }

    #[test]
    fn timeout_parsed() {
        let config = load(&[
            ("CATALOG_API_BASE", "http://x"),
            ("CATALOG_REQUEST_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        for raw in ["0", "soon"] {
            let err = load(&[
                ("CATALOG_API_BASE", "http://x"),
                ("CATALOG_REQUEST_TIMEOUT_SECS", raw),
            ])
            .unwrap_err();
            assert_matches!(err, ConfigError::Invalid { name: "CATALOG_REQUEST_TIMEOUT_SECS", .. });
        }
    }
}
