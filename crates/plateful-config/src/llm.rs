use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream completion API configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key for bearer authentication
    pub api_key: SecretString,
    /// Base URL of the chat-completion API
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retries after the initial attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff delay in milliseconds (doubled per attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Value for the `X-Title` identification header
    #[serde(default)]
    pub site_name: Option<String>,
    /// Value for the `HTTP-Referer` identification header
    #[serde(default)]
    pub site_url: Option<String>,
}

impl LlmConfig {
    /// Per-attempt timeout as a `Duration`
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base backoff delay as a `Duration`
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_owned()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1_000
}
