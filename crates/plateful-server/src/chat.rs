//! Raw streaming completion endpoint
//!
//! Bridges the upstream chunk stream onto an outbound SSE response: one
//! `data: {"content": "..."}` event per content delta, closed by a
//! `data: [DONE]` sentinel.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::{Stream, StreamExt, stream};

use plateful_llm::{ChunkStream, CompletionRequest};

use crate::error::error_response;
use crate::identity::Identity;
use crate::state::AppState;

/// Handle `POST /api/chat/stream`
pub async fn chat_stream(
    State(state): State<AppState>,
    Identity(_ctx): Identity,
    Json(request): Json<CompletionRequest>,
) -> Response {
    match state.llm.stream_complete(&request).await {
        Ok(chunks) => stream_response(chunks).into_response(),
        Err(error) => error_response(&error),
    }
}

/// Re-emit upstream chunks as outbound SSE events
fn stream_response(chunks: ChunkStream) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let event_stream = chunks
        .filter_map(|result| async move {
            match result {
                // Role-only deltas carry nothing to forward
                Ok(chunk) => chunk.first_content().map(|content| {
                    let data = serde_json::json!({ "content": content });
                    Ok(Event::default().data(data.to_string()))
                }),
                Err(error) => {
                    let data = serde_json::json!({
                        "error": {
                            "message": error.to_string(),
                            "type": "streaming_error",
                        }
                    });
                    Some(Ok(Event::default().data(data.to_string())))
                }
            }
        })
        .chain(stream::once(async { Ok(Event::default().data("[DONE]")) }));

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
