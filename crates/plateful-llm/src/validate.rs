//! Pre-flight request validation
//!
//! Runs synchronously before any network I/O; a failure here is never
//! retried and never reaches the wire.

use serde_json::Value;

use crate::error::LlmError;
use crate::types::{CompletionRequest, ResponseFormat};

/// Validate a completion request before sending it
pub fn validate_request(request: &CompletionRequest) -> Result<(), LlmError> {
    if request.messages.is_empty() {
        return Err(LlmError::invalid("messages", "messages must not be empty"));
    }

    for message in &request.messages {
        if message.content.trim().is_empty() {
            return Err(LlmError::invalid(
                "messages",
                "every message must have non-empty content",
            ));
        }
    }

    if let Some(temperature) = request.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(LlmError::invalid(
            "temperature",
            format!("temperature must be between 0 and 2, got {temperature}"),
        ));
    }

    if let Some(top_p) = request.top_p
        && !(0.0..=1.0).contains(&top_p)
    {
        return Err(LlmError::invalid(
            "top_p",
            format!("top_p must be between 0 and 1, got {top_p}"),
        ));
    }

    if let Some(penalty) = request.frequency_penalty
        && !(-2.0..=2.0).contains(&penalty)
    {
        return Err(LlmError::invalid(
            "frequency_penalty",
            format!("frequency_penalty must be between -2 and 2, got {penalty}"),
        ));
    }

    if let Some(penalty) = request.presence_penalty
        && !(-2.0..=2.0).contains(&penalty)
    {
        return Err(LlmError::invalid(
            "presence_penalty",
            format!("presence_penalty must be between -2 and 2, got {penalty}"),
        ));
    }

    if request.max_tokens == Some(0) {
        return Err(LlmError::invalid(
            "max_tokens",
            "max_tokens must be greater than 0",
        ));
    }

    if let Some(format) = &request.response_format {
        validate_response_format(format)?;
    }

    Ok(())
}

/// Validate that a response format is strict-compatible
fn validate_response_format(format: &ResponseFormat) -> Result<(), LlmError> {
    let spec = format.spec();

    if !spec.strict {
        return Err(LlmError::invalid(
            "response_format",
            "json_schema.strict must be true",
        ));
    }

    if spec.name.is_empty() {
        return Err(LlmError::invalid(
            "response_format",
            "json_schema.name must not be empty",
        ));
    }

    if spec.schema.get("type").and_then(Value::as_str) != Some("object") {
        return Err(LlmError::invalid(
            "response_format",
            "json_schema.schema.type must be \"object\"",
        ));
    }

    if !spec
        .schema
        .get("required")
        .is_some_and(Value::is_array)
    {
        return Err(LlmError::invalid(
            "response_format",
            "json_schema.schema.required must be an explicit list",
        ));
    }

    if spec.schema.get("additionalProperties").and_then(Value::as_bool) != Some(false) {
        return Err(LlmError::invalid(
            "response_format",
            "json_schema.schema.additionalProperties must be false for strict mode",
        ));
    }

    Ok(())
}
