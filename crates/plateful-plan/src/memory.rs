//! In-memory store implementations
//!
//! Default backing for development and tests; the traits in `store` are
//! the seam a real row-store would plug into.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use uuid::Uuid;

use crate::meal::MealPlan;
use crate::preferences::UserPreferences;
use crate::store::{
    ActionType, AnalyticsSink, PlanRecord, PlanStatus, PlanStore, PreferencesStore, StoreError,
};

/// Preferences kept in a concurrent map
#[derive(Debug, Default)]
pub struct MemoryPreferencesStore {
    rows: DashMap<String, UserPreferences>,
}

impl MemoryPreferencesStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed preferences for a user
    pub fn insert(&self, user_id: impl Into<String>, preferences: UserPreferences) {
        self.rows.insert(user_id.into(), preferences);
    }
}

#[async_trait]
impl PreferencesStore for MemoryPreferencesStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserPreferences>, StoreError> {
        Ok(self.rows.get(user_id).map(|r| r.value().clone()))
    }
}

/// Plan records kept in a concurrent map, one row per user
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    rows: DashMap<String, PlanRecord>,
}

impl MemoryPlanStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert_with(
        &self,
        user_id: &str,
        plan: Option<MealPlan>,
        status: PlanStatus,
        generated_at: Option<Timestamp>,
    ) -> PlanRecord {
        let mut entry = self
            .rows
            .entry(user_id.to_owned())
            .or_insert_with(|| PlanRecord {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                plan: None,
                status: PlanStatus::Pending,
                generated_at: None,
                created_at: Timestamp::now(),
            });

        entry.plan = plan;
        entry.status = status;
        entry.generated_at = generated_at;
        entry.clone()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn current_plan(&self, user_id: &str) -> Result<Option<PlanRecord>, StoreError> {
        Ok(self.rows.get(user_id).map(|r| r.value().clone()))
    }

    async fn upsert_pending(&self, user_id: &str) -> Result<PlanRecord, StoreError> {
        Ok(self.upsert_with(user_id, None, PlanStatus::Pending, None))
    }

    async fn upsert_generated(
        &self,
        user_id: &str,
        plan: MealPlan,
    ) -> Result<PlanRecord, StoreError> {
        Ok(self.upsert_with(
            user_id,
            Some(plan),
            PlanStatus::Generated,
            Some(Timestamp::now()),
        ))
    }

    async fn mark_error(&self, user_id: &str) -> Result<(), StoreError> {
        if let Some(mut entry) = self.rows.get_mut(user_id) {
            entry.status = PlanStatus::Error;
        }
        Ok(())
    }
}

/// A recorded analytics event
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    /// User the event belongs to
    pub user_id: String,
    /// What happened
    pub action: ActionType,
    /// Optional structured context
    pub metadata: Option<serde_json::Value>,
}

/// Analytics sink that records events for inspection in tests
#[derive(Debug, Default)]
pub struct MemoryAnalytics {
    events: Mutex<Vec<RecordedEvent>>,
}

impl MemoryAnalytics {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AnalyticsSink for MemoryAnalytics {
    async fn log_event(
        &self,
        user_id: &str,
        action: ActionType,
        metadata: Option<serde_json::Value>,
    ) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(RecordedEvent {
            user_id: user_id.to_owned(),
            action,
            metadata,
        });
    }
}
