//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the checker can run against a local
//! authority with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use netops_shared::OperatorId;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the conditions authority.
    /// Env: `NETOPS_AUTHORITY_URL`
    /// Default: `http://127.0.0.1:8080`
    pub authority_url: String,

    /// Timeout applied to every authority request.
    /// Env: `NETOPS_REQUEST_TIMEOUT_SECS`
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// JSON file holding the user's operators and servers.
    /// Env: `NETOPS_SERVERS_FILE`
    /// Default: `./servers.json`
    pub servers_file: PathBuf,

    /// Operator to switch on after loading.
    /// Env: `NETOPS_ACCEPT`
    /// Default: none
    pub accept_operator: Option<OperatorId>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            authority_url: "http://127.0.0.1:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            servers_file: PathBuf::from("./servers.json"),
            accept_operator: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = var("NETOPS_AUTHORITY_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                config.authority_url = url.to_string();
            } else {
                tracing::warn!(value = %url, "Invalid NETOPS_AUTHORITY_URL, using default");
            }
        }

        if let Some(val) = var("NETOPS_REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %val, "Invalid NETOPS_REQUEST_TIMEOUT_SECS, using default");
                }
            }
        }

        if let Some(path) = var("NETOPS_SERVERS_FILE") {
            config.servers_file = PathBuf::from(path);
        }

        if let Some(val) = var("NETOPS_ACCEPT") {
            if !val.is_empty() {
                match val.parse::<i64>() {
                    Ok(id) => config.accept_operator = Some(OperatorId(id)),
                    Err(e) => {
                        tracing::warn!(value = %val, error = %e, "Invalid NETOPS_ACCEPT, ignoring");
                    }
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = load(&[]);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.accept_operator, None);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("NETOPS_AUTHORITY_URL", "https://conditions.example/api/"),
            ("NETOPS_REQUEST_TIMEOUT_SECS", "5"),
            ("NETOPS_SERVERS_FILE", "/tmp/servers.json"),
            ("NETOPS_ACCEPT", "2"),
        ]);
        assert_eq!(config.authority_url, "https://conditions.example/api");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.servers_file, PathBuf::from("/tmp/servers.json"));
        assert_eq!(config.accept_operator, Some(OperatorId(2)));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = load(&[
            ("NETOPS_AUTHORITY_URL", "ftp://nope"),
            ("NETOPS_REQUEST_TIMEOUT_SECS", "0"),
            ("NETOPS_ACCEPT", "acme"),
        ]);
        assert_eq!(config, ClientConfig::default());
    }
}
