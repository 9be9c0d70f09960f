//! Client construction parameters.
//!
//! Username and password are optional: without both, the client is built
//! unauthenticated and no login is attempted.

use std::time::Duration;

use crate::transport::DEFAULT_TIMEOUT;

/// Default CloudBeaver GraphQL endpoint.
pub const DEFAULT_URL: &str = "http://localhost:8978/api/gql";

pub const ENV_URL: &str = "CLOUDBEAVER_URL";
pub const ENV_USERNAME: &str = "CLOUDBEAVER_USERNAME";
pub const ENV_PASSWORD: &str = "CLOUDBEAVER_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "CLOUDBEAVER_TIMEOUT_SECS";

#[derive(Clone)]
pub struct ClientConfig {
    pub url: String,
    pub username: Option<String>,
    /// Plaintext; hashed when the client is built and not kept afterwards.
    pub password: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Config from optional parts; `None` for `url` selects the default.
    pub fn new(url: Option<&str>, username: Option<&str>, password: Option<&str>) -> Self {
        Self {
            url: url.map_or_else(|| DEFAULT_URL.to_string(), str::to_string),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `CLOUDBEAVER_URL`, `CLOUDBEAVER_USERNAME`, `CLOUDBEAVER_PASSWORD`
    /// and `CLOUDBEAVER_TIMEOUT_SECS`. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout = lookup(ENV_TIMEOUT_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        Self {
            url: lookup(ENV_URL).unwrap_or_else(|| DEFAULT_URL.to_string()),
            username: lookup(ENV_USERNAME),
            password: lookup(ENV_PASSWORD),
            timeout,
        }
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "http://localhost:8978/api/gql");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.has_credentials());
    }

    #[test]
    fn new_keeps_explicit_url() {
        let config = ClientConfig::new(Some("http://test/api/gql"), Some("alice"), Some("secret"));
        assert_eq!(config.url, "http://test/api/gql");
        assert!(config.has_credentials());
    }

    #[test]
    fn one_credential_is_not_enough() {
        assert!(!ClientConfig::new(None, Some("alice"), None).has_credentials());
        assert!(!ClientConfig::new(None, None, Some("secret")).has_credentials());
    }

    #[test]
    fn from_lookup_reads_all_keys() {
        let vars: HashMap<&str, &str> = [
            (ENV_URL, "http://cb:8978/api/gql"),
            (ENV_USERNAME, "cbadmin"),
            (ENV_PASSWORD, "pw"),
            (ENV_TIMEOUT_SECS, "3"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.url, "http://cb:8978/api/gql");
        assert_eq!(config.username.as_deref(), Some("cbadmin"));
        assert_eq!(config.password.as_deref(), Some("pw"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        let config = ClientConfig::from_lookup(|k| (k == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn debug_redacts_password() {
        let config = ClientConfig::new(None, Some("alice"), Some("secret"));
        assert!(!format!("{config:?}").contains("secret"));
    }
}
