//! Meal-plan endpoints

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use plateful_plan::ActionType;

use crate::error::error_response;
use crate::identity::Identity;
use crate::state::AppState;

/// Body of `POST /api/meal-plans`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateBody {
    /// Whether this call replaces an existing plan
    #[serde(default)]
    pub regeneration: bool,
}

/// Handle `GET /api/meal-plans/current`
pub async fn current_plan(State(state): State<AppState>, Identity(ctx): Identity) -> Response {
    match state.plans.current_meal_plan(&ctx).await {
        Ok(record) => Json(record).into_response(),
        Err(error) => error_response(&error),
    }
}

/// Handle `POST /api/meal-plans`
///
/// Runs a full generation synchronously; the analytics event is spawned
/// off the response path.
pub async fn generate_plan(
    State(state): State<AppState>,
    Identity(ctx): Identity,
    Json(body): Json<GenerateBody>,
) -> Response {
    match state.plans.generate_meal_plan(&ctx, body.regeneration).await {
        Ok(record) => {
            let action = if body.regeneration {
                ActionType::PlanRegenerated
            } else {
                ActionType::PlanGenerated
            };
            let analytics = state.analytics.clone();
            let user_id = ctx.user_id.clone();
            tokio::spawn(async move {
                analytics.log_event(&user_id, action, None).await;
            });

            Json(record).into_response()
        }
        Err(error) => error_response(&error),
    }
}
