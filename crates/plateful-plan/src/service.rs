//! Plan service: generation tied to the collaborator stores
//!
//! Drives the store lifecycle around a generation: preferences lookup,
//! concurrent-generation rejection, pending upsert, generated upsert or
//! error mark. Analytics and error marking are best-effort and never mask
//! the primary outcome.

use std::sync::Arc;

use plateful_core::UserContext;

use crate::error::PlanError;
use crate::generator::MealPlanGenerator;
use crate::store::{PlanRecord, PlanStatus, PlanStore, PreferencesStore};

/// Generation and retrieval of a user's plan record
pub struct PlanService {
    generator: MealPlanGenerator,
    preferences: Arc<dyn PreferencesStore>,
    plans: Arc<dyn PlanStore>,
}

impl PlanService {
    /// Wire the generator to its stores
    pub fn new(
        generator: MealPlanGenerator,
        preferences: Arc<dyn PreferencesStore>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            generator,
            preferences,
            plans,
        }
    }

    /// Generate (or regenerate) the plan for a user
    ///
    /// Rejects the call with `MissingPreferences` when the user has no
    /// stored preferences and with `Conflict` when a generation for the
    /// same user is already pending.
    pub async fn generate_meal_plan(
        &self,
        ctx: &UserContext,
        regeneration: bool,
    ) -> Result<PlanRecord, PlanError> {
        let preferences = self
            .preferences
            .get(&ctx.user_id)
            .await?
            .ok_or(PlanError::MissingPreferences)?;

        if let Some(existing) = self.plans.current_plan(&ctx.user_id).await?
            && existing.status == PlanStatus::Pending
        {
            return Err(PlanError::Conflict);
        }

        self.plans.upsert_pending(&ctx.user_id).await?;

        let plan = match self.generator.generate(&preferences).await {
            Ok(plan) => plan,
            Err(error) => {
                tracing::warn!(
                    user_id = %ctx.user_id,
                    regeneration,
                    error = %error,
                    "meal plan generation failed"
                );
                // Best-effort: a failed status write must not mask the
                // generation error
                if let Err(store_error) = self.plans.mark_error(&ctx.user_id).await {
                    tracing::error!(
                        user_id = %ctx.user_id,
                        error = %store_error,
                        "failed to mark plan record as errored"
                    );
                }
                return Err(error);
            }
        };

        let record = self.plans.upsert_generated(&ctx.user_id, plan).await?;

        tracing::info!(user_id = %ctx.user_id, regeneration, "meal plan generated");

        Ok(record)
    }

    /// Fetch the user's current plan record
    pub async fn current_meal_plan(&self, ctx: &UserContext) -> Result<PlanRecord, PlanError> {
        self.plans
            .current_plan(&ctx.user_id)
            .await?
            .ok_or(PlanError::NotFound)
    }
}
