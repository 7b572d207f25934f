//! Client configuration and the process-wide default.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9000";

pub const ENDPOINT_VAR: &str = "OCTOPARTS_ENDPOINT";
pub const TIMEOUT_VAR: &str = "OCTOPARTS_TIMEOUT_SEC";
pub const OPEN_TIMEOUT_VAR: &str = "OCTOPARTS_OPEN_TIMEOUT_SEC";

/// Settings shared by every call of a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the gateway; the API paths are appended to it.
    pub endpoint: String,
    /// Read-phase deadline.
    pub timeout: Option<Duration>,
    /// Connect-phase deadline.
    pub open_timeout: Option<Duration>,
    /// Headers sent with every request.
    pub headers: HeaderMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            open_timeout: None,
            headers: HeaderMap::new(),
        }
    }
}

impl Config {
    /// Reads the configuration from `OCTOPARTS_*` environment variables.
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] or [`Error::InvalidUrl`] for malformed values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            let endpoint = endpoint.trim();
            Url::parse(endpoint)?;
            config.endpoint = endpoint.to_string();
        }
        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.timeout = Some(parse_seconds(TIMEOUT_VAR, &secs)?);
        }
        if let Some(secs) = lookup(OPEN_TIMEOUT_VAR) {
            config.open_timeout = Some(parse_seconds(OPEN_TIMEOUT_VAR, &secs)?);
        }
        Ok(config)
    }

    /// The process-wide default, read from the environment on first access.
    ///
    /// A malformed environment is logged and replaced by [`Config::default`].
    pub fn global() -> &'static Config {
        static GLOBAL: OnceLock<Config> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            Config::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring malformed Octoparts environment configuration");
                Config::default()
            })
        })
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

fn parse_seconds(var: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{var} must be a number of seconds, got {raw:?}")))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::Configuration(format!("{var} must be a non-negative number of seconds, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_localhost() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.timeout, None);
        assert_eq!(config.open_timeout, None);
    }

    #[test]
    fn reads_endpoint_and_timeouts() {
        let config = Config::from_lookup(lookup(&[
            (ENDPOINT_VAR, "http://octoparts.internal:8080"),
            (TIMEOUT_VAR, "0"),
            (OPEN_TIMEOUT_VAR, "1.5"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://octoparts.internal:8080");
        assert_eq!(config.timeout, Some(Duration::ZERO));
        assert_eq!(config.open_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn malformed_values_are_configuration_errors() {
        let err = Config::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = Config::from_lookup(lookup(&[(OPEN_TIMEOUT_VAR, "-1")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = Config::from_lookup(lookup(&[(ENDPOINT_VAR, "not a url")])).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn with_header_validates() {
        assert!(Config::default().with_header("x-service", "web").is_ok());
        assert!(Config::default().with_header("bad header", "x").is_err());
    }
}
