use std::sync::Arc;

use plateful_llm::LlmClient;
use plateful_plan::{AnalyticsSink, PlanService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Plan generation and retrieval
    pub plans: Arc<PlanService>,
    /// Completion client for the raw streaming endpoint
    pub llm: Arc<LlmClient>,
    /// Fire-and-forget event sink
    pub analytics: Arc<dyn AnalyticsSink>,
}
