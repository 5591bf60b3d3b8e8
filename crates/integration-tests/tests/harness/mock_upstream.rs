//! Mock upstream completion API for integration tests
//!
//! Implements a minimal OpenRouter-compatible surface that returns canned
//! responses and records what it was asked.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Mock upstream that returns predictable responses
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    completion_count: AtomicU32,
    /// Number of requests to fail before succeeding (`u32::MAX` = always)
    fail_count: AtomicU32,
    fail_status: StatusCode,
    /// Custom assistant content (if set)
    response_content: Option<String>,
    /// When set, completions block until [`MockUpstream::release`]
    hold: Option<Notify>,
    /// Body of the most recent completion request
    last_request: Mutex<Option<serde_json::Value>>,
}

impl MockUpstream {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, StatusCode::INTERNAL_SERVER_ERROR, None, false).await
    }

    /// Start a mock that fails the first `n` completion requests
    pub async fn start_failing(n: u32, status: StatusCode) -> anyhow::Result<Self> {
        Self::start_inner(n, status, None, false).await
    }

    /// Start a mock with custom assistant content
    pub async fn start_with_content(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, StatusCode::INTERNAL_SERVER_ERROR, Some(content.to_owned()), false)
            .await
    }

    /// Start a mock whose completions block until [`Self::release`]
    pub async fn start_held(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, StatusCode::INTERNAL_SERVER_ERROR, Some(content.to_owned()), true)
            .await
    }

    async fn start_inner(
        fail_count: u32,
        fail_status: StatusCode,
        response_content: Option<String>,
        held: bool,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            completion_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            fail_status,
            response_content,
            hold: held.then(Notify::new),
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/chat/completions", routing::post(handle_completions))
            .route("/models", routing::get(handle_models))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            state,
        })
    }

    /// Base URL for pointing the client at the mock
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }

    /// Body of the most recent completion request
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.state.last_request.lock().unwrap().clone()
    }

    /// Let one held completion request respond
    ///
    /// Stores a permit, so releasing before the request arrives also works.
    pub fn release(&self) {
        if let Some(hold) = &self.state.hold {
            hold.notify_one();
        }
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_completions(
    State(state): State<Arc<MockState>>,
    Json(request): Json<serde_json::Value>,
) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(request.clone());

    if let Some(hold) = &state.hold {
        hold.notified().await;
    }

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (
            state.fail_status,
            Json(serde_json::json!({
                "error": {
                    "message": "mock upstream intentional failure",
                    "type": "server_error"
                }
            })),
        )
            .into_response();
    }

    let content = state
        .response_content
        .as_deref()
        .unwrap_or("Hello from the mock upstream");
    let model = request["model"].as_str().unwrap_or("mock-model").to_owned();

    if request["stream"].as_bool().unwrap_or(false) {
        return streaming_response(content, &model);
    }

    Json(serde_json::json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000u64,
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 },
    }))
    .into_response()
}

/// Build an SSE streaming body: role chunk, two content deltas, a finish
/// chunk, and the `[DONE]` sentinel
fn streaming_response(content: &str, model: &str) -> Response {
    let chunk = |delta: serde_json::Value, finish: Option<&str>| {
        serde_json::json!({
            "id": "chatcmpl-test-stream",
            "model": model,
            "created": 1_700_000_000u64,
            "choices": [{ "index": 0, "delta": delta, "finish_reason": finish }],
        })
    };

    let (head, tail) = content.split_at(content.len() / 2);
    let chunks = [
        chunk(serde_json::json!({ "role": "assistant" }), None),
        chunk(serde_json::json!({ "content": head }), None),
        chunk(serde_json::json!({ "content": tail }), None),
        chunk(serde_json::json!({}), Some("stop")),
    ];

    let mut body = String::new();
    for c in chunks {
        body.push_str(&format!("data: {c}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");

    (
        [(axum::http::header::CONTENT_TYPE, "text/event-stream")],
        body,
    )
        .into_response()
}

async fn handle_models() -> impl IntoResponse {
    Json(serde_json::json!({
        "data": [{
            "id": "openai/gpt-4o-mini",
            "name": "GPT-4o mini",
            "context_length": 128_000,
            "pricing": { "prompt": "0.00000015", "completion": "0.0000006" },
        }]
    }))
}
