//! Configuration types for the visualizer API client

use std::time::Duration;
use url::Url;

use super::error::{ClientError, Result};

/// Origin the backend listens on when started locally
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the backend origin
pub const BASE_URL_ENV: &str = "VISUALIZER_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "VISUALIZER_TIMEOUT_SECS";

/// Configuration for a [`crate::VisualizerApi`] instance
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin every endpoint is resolved against
    pub base_url: Url,
    /// Whole-request timeout. Rendering a video happens inside the request,
    /// so this is generous.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the given origin with default timeout and user agent
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = parse_base_url(&base_url)?;
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            let secs = timeout.trim().parse::<u64>().map_err(|_| ClientError::Configuration {
                message: format!("timeout '{}' is not a whole number of seconds", timeout),
                field: Some(TIMEOUT_ENV.to_string()),
                suggestion: Some(format!("Set {} to a value such as 300", TIMEOUT_ENV)),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Constant is a valid absolute URL
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
            timeout: Duration::from_secs(300),
            user_agent: concat!("visualizer-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Configuration {
            message: format!("'{}' is not an http(s) origin", raw),
            field: Some(BASE_URL_ENV.to_string()),
            suggestion: Some("Use an absolute URL such as http://127.0.0.1:8000".to_string()),
        });
    }

    Ok(url)
}
