//! Generation orchestration for the dashboard
//!
//! A per-session state machine that drives a single long-running plan
//! generation to a terminal state. Every failure path resolves into a
//! renderable `Error` state; a previously loaded plan is never lost to a
//! failed or cancelled regeneration.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod backend;
pub mod dashboard;
pub mod state;

pub use backend::PlanBackend;
pub use dashboard::{Dashboard, Outcome};
pub use state::GenerationState;
