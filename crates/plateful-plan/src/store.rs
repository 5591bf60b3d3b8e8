//! Collaborator store interfaces
//!
//! Persistence, authentication, and analytics live outside this core;
//! these traits are the seams the domain talks through. The plan store
//! enforces a 1:1 relationship — one plan record per user, upserted.

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::meal::MealPlan;
use crate::preferences::UserPreferences;

/// A collaborator store failed
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Lifecycle status of a user's plan record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Generation in progress
    Pending,
    /// A valid plan is stored
    Generated,
    /// The last generation attempt failed
    Error,
}

/// The stored plan row for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Record identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: String,
    /// The plan, present only when status is `Generated`
    pub plan: Option<MealPlan>,
    /// Lifecycle status
    pub status: PlanStatus,
    /// When the plan was generated
    pub generated_at: Option<Timestamp>,
    /// When the record was first created
    pub created_at: Timestamp,
}

/// Read-only access to stored dietary preferences
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// Fetch a user's preferences, `None` when they have not been set
    async fn get(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError>;
}

/// Persistence for the single plan record per user
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// The user's current plan record, `None` when absent
    async fn current_plan(&self, user_id: &str) -> Result<Option<PlanRecord>, StoreError>;

    /// Create or reset the record to `Pending` with no plan
    async fn upsert_pending(&self, user_id: &str) -> Result<PlanRecord, StoreError>;

    /// Store a freshly generated plan with `Generated` status
    async fn upsert_generated(&self, user_id: &str, plan: MealPlan)
    -> Result<PlanRecord, StoreError>;

    /// Flip the record to `Error` after a failed generation
    async fn mark_error(&self, user_id: &str) -> Result<(), StoreError>;
}

/// User actions worth recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// First-ever plan generated for the user
    PlanGenerated,
    /// User replaced an existing plan
    PlanRegenerated,
}

/// Fire-and-forget analytics
///
/// Infallible by contract: implementations swallow their own failures so
/// logging can never disturb the caller's control flow.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Record an event, best-effort
    async fn log_event(&self, user_id: &str, action: ActionType, metadata: Option<serde_json::Value>);
}
