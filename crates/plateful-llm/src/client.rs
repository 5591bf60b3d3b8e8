//! The completion client
//!
//! Stateless per call: configuration is fixed at construction and every
//! operation validates its input, then runs the shared retry loop with a
//! per-attempt timeout and exponential backoff.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use plateful_config::LlmConfig;

use crate::error::LlmError;
use crate::sse;
pub use crate::sse::ChunkStream;
use crate::types::{
    CompletionRequest, CompletionResponse, JsonSchemaSpec, Message, Model, ResponseFormat,
};
use crate::validate;

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Error body shape returned by the upstream API
#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
}

/// Response shape of the models listing
#[derive(Debug, Deserialize)]
struct WireModelList {
    data: Vec<Model>,
}

/// Client for one chat-completion deployment
///
/// Holds no mutable state across calls; cloning is cheap and the same
/// instance may serve concurrent requests.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    default_model: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    site_name: Option<String>,
    site_url: Option<String>,
}

impl LlmClient {
    /// Create a client from configuration
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (cannot happen).
    pub fn from_config(config: &LlmConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            default_model: config.default_model.clone(),
            timeout: config.timeout(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            site_name: config.site_name.clone(),
            site_url: config.site_url.clone(),
        }
    }

    /// Override the per-attempt timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy
    #[must_use]
    pub const fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Retries performed after the initial attempt
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Non-streaming completion call
    ///
    /// Validates the request before any network I/O, then runs the retry
    /// loop. The final error after an exhausted retry budget is typed per
    /// the failure class.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        validate::validate_request(request)?;

        let body = self.wire_body(request, false);
        let url = self.completions_url();

        let response = self
            .send_with_retry(|| self.http.post(&url).json(&body))
            .await?;

        response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("failed to parse response: {e}")))
    }

    /// Completion constrained to a strict JSON schema, parsed into `T`
    ///
    /// Sets `response_format` to strict JSON-schema mode and parses the
    /// first choice's content; a parse failure is wrapped rather than
    /// exposed as raw serde output.
    pub async fn complete_with_schema<T: DeserializeOwned>(
        &self,
        messages: Vec<Message>,
        schema: JsonSchemaSpec,
        mut options: CompletionRequest,
    ) -> Result<T, LlmError> {
        options.messages = messages;
        options.response_format = Some(ResponseFormat::json_schema(schema));

        let response = self.complete(&options).await?;
        let content = response
            .first_content()
            .ok_or_else(|| LlmError::MalformedResponse("response contained no choices".into()))?;

        serde_json::from_str(content).map_err(|e| {
            LlmError::MalformedResponse(format!("failed to parse structured response: {e}"))
        })
    }

    /// Streaming completion call
    ///
    /// Each call opens a fresh connection; the returned sequence is finite
    /// and not restartable. A non-2xx initial response is read once and
    /// raised as a typed error — no partial stream is exposed. Dropping the
    /// stream cancels the transfer.
    pub async fn stream_complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, LlmError> {
        validate::validate_request(request)?;

        let body = self.wire_body(request, true);
        let url = self.completions_url();

        let response = self
            .send_with_retry(|| self.http.post(&url).json(&body))
            .await?;

        Ok(sse::chunk_stream(response.bytes_stream()))
    }

    /// List the models the upstream offers
    ///
    /// Plain passthrough under the base retry policy.
    pub async fn available_models(&self) -> Result<Vec<Model>, LlmError> {
        let url = self.endpoint_url("/models");

        let response = self.send_with_retry(|| self.http.get(&url)).await?;

        let list: WireModelList = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(format!("failed to parse model list: {e}")))?;

        Ok(list.data)
    }

    /// Fill in the model default and stream flag for the wire
    fn wire_body(&self, request: &CompletionRequest, stream: bool) -> CompletionRequest {
        let mut body = request.clone();
        if body.model.is_none() {
            body.model = Some(self.default_model.clone());
        }
        body.stream = stream;
        body
    }

    fn completions_url(&self) -> String {
        self.endpoint_url("/chat/completions")
    }

    fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Attach the fixed headers every upstream call carries
    fn decorate(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder.bearer_auth(self.api_key.expose_secret());

        if let Some(name) = &self.site_name {
            builder = builder.header("X-Title", name);
        }
        if let Some(url) = &self.site_url {
            builder = builder.header("HTTP-Referer", url);
        }

        builder
    }

    /// Shared execution loop: timeout per attempt, backoff between attempts
    async fn send_with_retry(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<reqwest::Response, LlmError> {
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(self.decorate(build())).await {
                Ok(response) => return Ok(response),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(self.retry_delay, attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "retrying upstream request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Single attempt: race the HTTP call against the timeout, then map a
    /// non-2xx status to its typed error
    async fn send_once(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, LlmError> {
        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, retry_after, &body))
    }
}

/// Backoff before retry `attempt + 1`: `base * 2^attempt`
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Map an error status and body to the typed taxonomy
fn map_status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> LlmError {
    let message = serde_json::from_str::<WireErrorBody>(body)
        .map_or_else(|_| fallback_message(status, body), |b| b.error.message);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            message,
            retry_after,
        },
        StatusCode::BAD_REQUEST => LlmError::Validation {
            field: "request",
            message,
        },
        StatusCode::NOT_FOUND => LlmError::Model("model not found or unavailable".to_owned()),
        s if s.is_server_error() => LlmError::Model(message),
        s => LlmError::Api {
            status: s.as_u16(),
            message,
        },
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        format!("upstream returned {status}")
    } else {
        body.trim().to_owned()
    }
}
