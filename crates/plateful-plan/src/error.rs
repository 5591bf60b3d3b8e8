use http::StatusCode;
use plateful_core::HttpError;
use thiserror::Error;

use crate::meal::SchemaError;
use crate::store::StoreError;

/// Domain errors for plan generation and retrieval
#[derive(Debug, Error)]
pub enum PlanError {
    /// The model failed to produce a usable plan within the client's
    /// retry budget
    #[error("failed to generate a meal plan after {retries} retries")]
    Generation {
        /// Retries the completion client attempted
        retries: u32,
    },

    /// Upstream AI service cannot be reached or is failing
    #[error("the AI service is temporarily unavailable")]
    Unavailable,

    /// Generation exceeded the client-side deadline
    #[error("meal plan generation timed out")]
    Timeout,

    /// The user has not filled in their dietary preferences yet
    #[error("dietary preferences not found")]
    MissingPreferences,

    /// A generation for this user is already in flight
    #[error("a plan is already being generated for this user")]
    Conflict,

    /// Credentials were rejected; handled by the session layer, never
    /// rendered as a local error
    #[error("authentication required")]
    Unauthorized,

    /// The user has no plan yet
    #[error("no meal plan found")]
    NotFound,

    /// Model output did not match the plan shape
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A collaborator store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl PlanError {
    /// Whether retrying the same operation may succeed without the user
    /// changing anything first
    pub const fn user_retryable(&self) -> bool {
        !matches!(self, Self::MissingPreferences | Self::Unauthorized)
    }
}

impl HttpError for PlanError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Generation { .. } | Self::Schema(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::MissingPreferences => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Generation { .. } => "generation_error",
            Self::Unavailable => "service_unavailable",
            Self::Timeout => "timeout_error",
            Self::MissingPreferences => "missing_preferences",
            Self::Conflict => "generation_conflict",
            Self::Unauthorized => "authentication_error",
            Self::NotFound => "not_found",
            Self::Schema(_) => "schema_validation_error",
            Self::Store(_) => "store_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Store(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
