//! Backend seam between the state machine and plan generation

use async_trait::async_trait;
use plateful_core::UserContext;
use plateful_plan::{MealPlan, PlanError, PlanService, PlanStatus, StoreError};

/// What the dashboard needs from the generation side
///
/// Implemented by `PlanService` in production and by stubs in tests.
#[async_trait]
pub trait PlanBackend: Send + Sync {
    /// The user's current plan, `None` when they have none yet
    async fn current_plan(&self, ctx: &UserContext) -> Result<Option<MealPlan>, PlanError>;

    /// Run one full generation for the user
    async fn generate(&self, ctx: &UserContext, regeneration: bool) -> Result<MealPlan, PlanError>;
}

#[async_trait]
impl PlanBackend for PlanService {
    async fn current_plan(&self, ctx: &UserContext) -> Result<Option<MealPlan>, PlanError> {
        match self.current_meal_plan(ctx).await {
            // Pending or errored records have nothing to display
            Ok(record) if record.status == PlanStatus::Generated => Ok(record.plan),
            Ok(_) => Ok(None),
            Err(PlanError::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn generate(&self, ctx: &UserContext, regeneration: bool) -> Result<MealPlan, PlanError> {
        let record = self.generate_meal_plan(ctx, regeneration).await?;
        record
            .plan
            .ok_or_else(|| PlanError::Store(StoreError("generated record missing plan".into())))
    }
}
