//! LLM-backed plan generation
//!
//! Owns prompt construction and output validation only. Retry, backoff,
//! and timeouts all live in the completion client; the generator trusts
//! that policy and translates the final client error into a domain error.

use plateful_llm::{CompletionRequest, LlmClient, LlmError, Message};

use crate::error::PlanError;
use crate::meal::MealPlan;
use crate::preferences::UserPreferences;
use crate::prompt;

/// Sampling temperature for plan generation
const TEMPERATURE: f64 = 0.7;

/// Token budget for a full 3-meal plan
const MAX_TOKENS: u32 = 2_000;

/// Generates meal plans through the completion client
#[derive(Debug, Clone)]
pub struct MealPlanGenerator {
    client: LlmClient,
}

impl MealPlanGenerator {
    /// Wrap a configured client
    pub const fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Generate a plan from the user's preferences
    ///
    /// Builds the prompts, runs one completion, parses the first choice as
    /// JSON, and validates the result into a `MealPlan`.
    pub async fn generate(&self, preferences: &UserPreferences) -> Result<MealPlan, PlanError> {
        let mut request = CompletionRequest::new(vec![
            Message::system(prompt::SYSTEM_PROMPT),
            Message::user(prompt::user_prompt(preferences)),
        ]);
        request.temperature = Some(TEMPERATURE);
        request.max_tokens = Some(MAX_TOKENS);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| self.map_client_error(&e))?;

        let content = response.first_content().ok_or_else(|| {
            tracing::error!("completion response contained no choices");
            PlanError::Generation {
                retries: self.client.max_retries(),
            }
        })?;

        let candidate: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            tracing::warn!(error = %e, "model returned unparseable plan JSON");
            PlanError::Generation {
                retries: self.client.max_retries(),
            }
        })?;

        MealPlan::validate(&candidate).map_err(|e| {
            tracing::warn!(error = %e, "model returned structurally invalid plan");
            PlanError::from(e)
        })
    }

    /// Translate a final client error into the domain taxonomy
    fn map_client_error(&self, error: &LlmError) -> PlanError {
        match error {
            LlmError::Timeout(_) => PlanError::Timeout,
            LlmError::Network(_) | LlmError::Model(_) => PlanError::Unavailable,
            LlmError::Auth(_) => PlanError::Unauthorized,
            _ => PlanError::Generation {
                retries: self.client.max_retries(),
            },
        }
    }
}
