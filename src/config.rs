// ABOUTME: Environment-based configuration for the Cartwise client
// ABOUTME: API base URL and HTTP timeout settings with parse-and-fallback semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Cartwise

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// Environment variable overriding the backend base URL
pub const ENV_API_URL: &str = "CARTWISE_API_URL";

/// Environment variable overriding the request timeout in seconds
pub const ENV_HTTP_TIMEOUT_SECS: &str = "CARTWISE_HTTP_TIMEOUT_SECS";

/// Environment variable overriding the connect timeout in seconds
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "CARTWISE_HTTP_CONNECT_TIMEOUT_SECS";

/// Backend base URL used when no override is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client configuration resolved from the environment
///
/// Invalid values never abort startup: they are logged and replaced with
/// the defaults, matching how the rest of the platform treats environment
/// configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    /// Total per-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: base_url_from_env(),
            timeout: Duration::from_secs(parse_secs(ENV_HTTP_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(parse_secs(
                ENV_HTTP_CONNECT_TIMEOUT_SECS,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }

    /// Replace the base URL, normalizing it the same way `from_env` does.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url)
            .unwrap_or_else(|| {
                warn!(base_url, "invalid base URL override, keeping previous value");
                self.base_url.clone()
            });
        self
    }
}

fn base_url_from_env() -> String {
    match env::var(ENV_API_URL) {
        Ok(raw) => normalize_base_url(&raw).unwrap_or_else(|| {
            warn!(
                value = %raw,
                "invalid {ENV_API_URL}, falling back to {DEFAULT_API_URL}"
            );
            DEFAULT_API_URL.to_owned()
        }),
        Err(_) => DEFAULT_API_URL.to_owned(),
    }
}

/// Validate and normalize a base URL: must parse as http(s), trailing
/// slashes are trimmed so path concatenation stays predictable.
fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| trimmed.to_owned())
}

fn parse_secs(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = %raw, "invalid {var}, falling back to {default}s");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn default_base_url_when_env_unset() {
        env::remove_var(ENV_API_URL);
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn trailing_slash_is_trimmed() {
        env::set_var(ENV_API_URL, "http://cart.example.com/");
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://cart.example.com");
        env::remove_var(ENV_API_URL);
    }

    #[test]
    #[serial]
    fn invalid_url_falls_back_to_default() {
        env::set_var(ENV_API_URL, "not a url");
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        env::remove_var(ENV_API_URL);
    }

    #[test]
    #[serial]
    fn invalid_timeout_falls_back_to_default() {
        env::set_var(ENV_HTTP_TIMEOUT_SECS, "soon");
        let config = ClientConfig::from_env();
        assert_eq!(config.timeout, Duration::from_secs(30));
        env::remove_var(ENV_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn with_base_url_override() {
        let config = ClientConfig::default().with_base_url("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
    }
}
