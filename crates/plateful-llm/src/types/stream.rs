use serde::{Deserialize, Serialize};

use super::response::FinishReason;

/// Incremental update within a streaming choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDelta {
    /// Role (present on the first chunk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Incremental text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChoice {
    /// Choice index this delta belongs to
    pub index: u32,
    /// Incremental delta
    pub delta: StreamDelta,
    /// Finish reason (present on the final chunk)
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Streaming counterpart of a completion response
///
/// The end of the stream is signaled by the transport's `[DONE]` sentinel,
/// not by a field on the chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Chunk identifier
    pub id: String,
    /// Model used for generation
    pub model: String,
    /// Unix timestamp of creation
    pub created: u64,
    /// Delta choices
    pub choices: Vec<StreamChoice>,
}

impl StreamChunk {
    /// Content of the first choice's delta, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }
}
