//! Completion client for the upstream chat-completion API
//!
//! Wraps a single OpenRouter-style endpoint with request validation,
//! per-attempt timeouts, exponential-backoff retries, and SSE stream
//! decoding. The client holds no mutable state between calls and is safe
//! to share across concurrent requests.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod sse;
pub mod types;
pub mod validate;

pub use client::{ChunkStream, LlmClient};
pub use error::LlmError;
pub use types::{
    Choice, CompletionRequest, CompletionResponse, FinishReason, JsonSchemaSpec, Message, Model,
    ResponseFormat, Role, StreamChunk, Usage,
};
