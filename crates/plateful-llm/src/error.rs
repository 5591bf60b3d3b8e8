use std::time::Duration;

use http::StatusCode;
use plateful_core::HttpError;
use thiserror::Error;

/// Errors raised by the completion client
///
/// A closed set of kinds so callers can handle each failure class
/// exhaustively instead of inspecting status codes or message text.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Upstream rejected the credentials (401/403)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Upstream rate limit (429); `retry_after` is a hint only and is
    /// never consumed by the client's own retry loop
    #[error("rate limit exceeded: {message}")]
    RateLimited {
        /// Upstream error message
        message: String,
        /// Seconds until the limit resets, when the upstream said so
        retry_after: Option<u64>,
    },

    /// Request failed local pre-flight checks, or upstream returned 400
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending request field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Model unavailable (404) or upstream server failure (5xx)
    #[error("model error: {0}")]
    Model(String),

    /// Client-side deadline elapsed before a response arrived
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure before a response was received
    #[error("network error: {0}")]
    Network(String),

    /// Any other HTTP status
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Upstream error message
        message: String,
    },

    /// A 2xx response whose body could not be interpreted
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Whether the same request may succeed if attempted again
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Model(_) | Self::Timeout(_) | Self::Network(_))
    }

    /// Shorthand for a pre-flight validation failure
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Model(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Network(_) | Self::Api { .. } => StatusCode::BAD_GATEWAY,
            Self::MalformedResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Auth(_) => "authentication_error",
            Self::RateLimited { .. } => "rate_limit_error",
            Self::Validation { .. } => "invalid_request_error",
            Self::Model(_) => "model_error",
            Self::Timeout(_) => "timeout_error",
            Self::Network(_) => "network_error",
            Self::Api { .. } => "upstream_error",
            Self::MalformedResponse(_) => "malformed_response_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
