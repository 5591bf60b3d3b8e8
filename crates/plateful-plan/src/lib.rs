//! Meal-plan generation domain
//!
//! Owns the plan shape and its validation, prompt construction from user
//! preferences, the generator that drives the completion client, and the
//! service tying generation to the collaborator stores.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod generator;
pub mod meal;
pub mod memory;
pub mod preferences;
pub mod prompt;
pub mod service;
pub mod store;

pub use error::PlanError;
pub use generator::MealPlanGenerator;
pub use meal::{Ingredient, Meal, MealPlan, SchemaError, meal_plan_schema};
pub use preferences::{DietType, HealthGoal, UserPreferences};
pub use service::PlanService;
pub use store::{
    ActionType, AnalyticsSink, PlanRecord, PlanStatus, PlanStore, PreferencesStore, StoreError,
};
