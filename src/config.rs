//! Client Configuration
//!
//! Settings for the UserOp Builder client, from explicit values or the
//! environment:
//! - `ZERODEV_PROJECT_ID` (required)
//! - `USEROP_BUILDER_URL` (default `http://localhost:3010`)
//! - `USEROP_POLL_INTERVAL_MS`, `USEROP_POLL_TIMEOUT_MS`

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{SdkError, SdkResult};
use crate::log_warn;
use crate::poller::PollConfig;

pub const ENV_PROJECT_ID: &str = "ZERODEV_PROJECT_ID";
pub const ENV_BUILDER_URL: &str = "USEROP_BUILDER_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "USEROP_POLL_INTERVAL_MS";
pub const ENV_POLL_TIMEOUT_MS: &str = "USEROP_POLL_TIMEOUT_MS";

/// Builder service address used when none is configured
pub const DEFAULT_BUILDER_URL: &str = "http://localhost:3010";

/// Per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub project_id: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub poll: PollConfig,
}

impl ClientConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            base_url: DEFAULT_BUILDER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll: PollConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll.normalized();
        self
    }

    /// Load from process environment variables
    pub fn from_env() -> SdkResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names
    pub fn from_lookup<F>(lookup: F) -> SdkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = lookup(ENV_PROJECT_ID)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| SdkError::config(format!("{} is not set", ENV_PROJECT_ID)))?;

        let mut config = Self::new(project_id.trim());

        if let Some(url) = lookup(ENV_BUILDER_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        let interval = parse_millis(&lookup, ENV_POLL_INTERVAL_MS)?;
        let timeout = parse_millis(&lookup, ENV_POLL_TIMEOUT_MS)?;
        config.poll = PollConfig::new(
            interval.unwrap_or(Duration::ZERO),
            timeout.unwrap_or(Duration::ZERO),
        );

        config.validate()?;
        Ok(config)
    }

    /// Check the project id and base URL
    pub fn validate(&self) -> SdkResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(SdkError::config("Project ID is empty"));
        }
        if self.project_id.contains('/') {
            return Err(SdkError::config("Project ID must not contain '/'"));
        }

        let parsed = Url::parse(&self.base_url)?;
        match parsed.scheme() {
            "https" => {}
            "http" => {
                let local = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1"));
                if !local {
                    log_warn!("config", "Builder URL is not using TLS", url = self.base_url);
                }
            }
            other => {
                return Err(SdkError::config(format!("Unsupported URL scheme: {}", other)));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(SdkError::config("Request timeout must be non-zero"));
        }

        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn parse_millis<F>(lookup: &F, name: &str) -> SdkResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| SdkError::config(format!("{} must be an integer, got '{}'", name, raw))),
    }
}
