//! Runtime configuration for the Linear client and the MCP tools
//!
//! Values come from environment variables. `LINEAR_API_KEY` is shared with
//! other Linear tooling; everything else uses the `LINEAR_MCP_` prefix.

use crate::{LinearMcpError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the Linear API key
pub const API_KEY_ENV: &str = "LINEAR_API_KEY";

/// Prefix for all other configuration variables
pub const ENV_PREFIX: &str = "LINEAR_MCP";

/// Default GraphQL endpoint
pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default number of activity probes in flight at once
pub const DEFAULT_PROBE_CONCURRENCY: usize = 4;

/// Default log file name used in MCP mode
pub const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Configuration for talking to Linear and running the tools
#[derive(Clone)]
pub struct LinearConfig {
    /// API key sent in the `Authorization` header
    pub api_key: Option<String>,
    /// GraphQL endpoint
    pub api_url: String,
    /// Timeout for a whole request
    pub request_timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    /// Upper bound on concurrent issue-activity probes
    pub probe_concurrency: usize,
    /// File name for MCP-mode logs
    pub log_file: String,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl fmt::Debug for LinearConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("probe_concurrency", &self.probe_concurrency)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl LinearConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Unparseable or out-of-range values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let prefixed = |suffix: &str| lookup(&format!("{ENV_PREFIX}_{suffix}"));

        let api_key = lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let api_url = prefixed("API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_url);

        let request_timeout = parse_validated(prefixed("REQUEST_TIMEOUT_SECS"), |secs: &u64| {
            *secs > 0
        })
        .map(Duration::from_secs)
        .unwrap_or(defaults.request_timeout);

        let connect_timeout = parse_validated(prefixed("CONNECT_TIMEOUT_SECS"), |secs: &u64| {
            *secs > 0
        })
        .map(Duration::from_secs)
        .unwrap_or(defaults.connect_timeout);

        let probe_concurrency =
            parse_validated(prefixed("PROBE_CONCURRENCY"), |n: &usize| *n >= 1)
                .unwrap_or(defaults.probe_concurrency);

        let log_file = prefixed("LOG_FILE")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.log_file);

        Self {
            api_key,
            api_url,
            request_timeout,
            connect_timeout,
            probe_concurrency,
            log_file,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the GraphQL endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the probe concurrency, clamped to at least one
    pub fn with_probe_concurrency(mut self, probe_concurrency: usize) -> Self {
        self.probe_concurrency = probe_concurrency.max(1);
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The API key, or a configuration error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            LinearMcpError::Config(format!(
                "{API_KEY_ENV} is not set; create a personal API key in Linear settings"
            ))
        })
    }
}

fn parse_validated<T, F>(raw: Option<String>, validator: F) -> Option<T>
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    raw.and_then(|value| value.trim().parse().ok())
        .filter(|value| validator(value))
}
