use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::error::error_response;
use crate::state::AppState;

/// Handle `GET /api/models`
pub async fn list_models(State(state): State<AppState>) -> Response {
    match state.llm.available_models().await {
        Ok(models) => Json(serde_json::json!({ "data": models })).into_response(),
        Err(error) => error_response(&error),
    }
}
