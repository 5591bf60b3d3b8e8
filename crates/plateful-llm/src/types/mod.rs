//! Wire types for the chat-completion API
//!
//! These serialize directly as the request/response bodies; optional fields
//! are omitted from the wire when unset.

pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod schema;
pub mod stream;

pub use message::{Message, Role};
pub use model::{Model, ModelPricing};
pub use request::{CompletionRequest, StopSequences};
pub use response::{Choice, ChoiceMessage, CompletionResponse, FinishReason, Usage};
pub use schema::{JsonSchemaSpec, ResponseFormat};
pub use stream::{StreamChoice, StreamChunk, StreamDelta};
