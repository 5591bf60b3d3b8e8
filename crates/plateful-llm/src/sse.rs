//! SSE decoding for streaming completions
//!
//! Raw bytes arrive in arbitrary slices; `eventsource-stream` reassembles
//! lines split across reads and drops comment lines. On top of that this
//! module terminates the sequence at the `[DONE]` sentinel and skips
//! payloads that fail to parse, so one malformed chunk never aborts an
//! otherwise healthy stream.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt, future};

use crate::error::LlmError;
use crate::types::StreamChunk;

/// Lazy sequence of stream chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

enum Item {
    Chunk(StreamChunk),
    Failed(LlmError),
    Done,
    Skip,
}

/// Decode an SSE byte stream into completion chunks
///
/// Finite: ends at the `[DONE]` sentinel or when the underlying transport
/// ends. Dropping the returned stream releases the transport.
pub fn chunk_stream<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let stream = bytes
        .eventsource()
        .map(|result| match result {
            Ok(event) => {
                let data = event.data.trim();
                if data == "[DONE]" {
                    return Item::Done;
                }

                match serde_json::from_str::<StreamChunk>(data) {
                    Ok(chunk) => Item::Chunk(chunk),
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping unparseable stream chunk");
                        Item::Skip
                    }
                }
            }
            Err(e) => Item::Failed(LlmError::Network(e.to_string())),
        })
        .take_while(|item| future::ready(!matches!(item, Item::Done)))
        .filter_map(|item| {
            future::ready(match item {
                Item::Chunk(chunk) => Some(Ok(chunk)),
                Item::Failed(error) => Some(Err(error)),
                Item::Done | Item::Skip => None,
            })
        });

    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use futures_util::stream;

    use super::*;

    fn bytes_stream(
        parts: Vec<&'static str>,
    ) -> impl Stream<Item = Result<&'static [u8], Infallible>> {
        stream::iter(parts.into_iter().map(|p| Ok(p.as_bytes())))
    }

    async fn collect(parts: Vec<&'static str>) -> Vec<Result<StreamChunk, LlmError>> {
        chunk_stream(bytes_stream(parts)).collect().await
    }

    fn chunk_json(content: &str) -> String {
        format!(
            "data: {{\"id\":\"c1\",\"model\":\"m\",\"created\":1,\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n"
        )
    }

    #[tokio::test]
    async fn decodes_whole_body_in_one_read() {
        let body: &'static str = Box::leak(
            format!("{}{}data: [DONE]\n\n", chunk_json("Hel"), chunk_json("lo")).into_boxed_str(),
        );

        let chunks = collect(vec![body]).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().first_content(), Some("Hel"));
        assert_eq!(chunks[1].as_ref().unwrap().first_content(), Some("lo"));
    }

    #[tokio::test]
    async fn reassembles_lines_split_across_reads() {
        // Split mid-line to simulate partial TCP reads
        let whole: &'static str = Box::leak(
            format!("{}{}data: [DONE]\n\n", chunk_json("Hel"), chunk_json("lo")).into_boxed_str(),
        );
        let (a, b) = whole.split_at(17);
        let (b, c) = b.split_at(40);

        let split = collect(vec![a, b, c]).await;
        let joined = collect(vec![whole]).await;

        let split: Vec<_> = split.into_iter().map(Result::unwrap).collect();
        let joined: Vec<_> = joined.into_iter().map(Result::unwrap).collect();
        assert_eq!(split, joined);
    }

    #[tokio::test]
    async fn skips_malformed_payload_mid_stream() {
        let body: &'static str = Box::leak(
            format!(
                "{}data: {{not json\n\n{}data: [DONE]\n\n",
                chunk_json("a"),
                chunk_json("b")
            )
            .into_boxed_str(),
        );

        let chunks = collect(vec![body]).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().first_content(), Some("a"));
        assert_eq!(chunks[1].as_ref().unwrap().first_content(), Some("b"));
    }

    #[tokio::test]
    async fn ignores_comment_lines() {
        let body: &'static str = Box::leak(
            format!(": keep-alive\n\n{}data: [DONE]\n\n", chunk_json("x")).into_boxed_str(),
        );

        let chunks = collect(vec![body]).await;
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn stops_at_done_sentinel() {
        let body: &'static str = Box::leak(
            format!("{}data: [DONE]\n\n{}", chunk_json("a"), chunk_json("never")).into_boxed_str(),
        );

        let chunks = collect(vec![body]).await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().first_content(), Some("a"));
    }
}
