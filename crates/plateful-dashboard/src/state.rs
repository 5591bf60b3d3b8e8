use jiff::Timestamp;
use plateful_plan::MealPlan;

/// Lifecycle of the plan currently on screen
///
/// Exactly one state is active at a time; transitions happen only through
/// the dashboard's operations. `previous_plan` rides along through
/// `Generating` and `Error` so a failed regeneration can fall back to the
/// last good plan.
#[derive(Debug, Clone)]
pub enum GenerationState {
    /// No plan yet
    Empty,
    /// A generation is in flight
    Generating {
        /// When the generation started
        started_at: Timestamp,
        /// Plan that was loaded before this generation began
        previous_plan: Option<MealPlan>,
    },
    /// A plan is loaded and displayed
    Loaded {
        /// The current plan
        plan: MealPlan,
    },
    /// The last operation failed in a renderable way
    Error {
        /// Human-readable description
        message: String,
        /// Whether a retry action makes sense without user changes
        retryable: bool,
        /// Plan still displayable beneath the error banner
        previous_plan: Option<MealPlan>,
    },
}

impl GenerationState {
    /// The plan a new generation should fall back to on failure
    pub fn fallback_plan(&self) -> Option<MealPlan> {
        match self {
            Self::Loaded { plan } => Some(plan.clone()),
            Self::Error { previous_plan, .. } | Self::Generating { previous_plan, .. } => {
                previous_plan.clone()
            }
            Self::Empty => None,
        }
    }

    /// Whether a generation is currently in flight
    pub const fn is_generating(&self) -> bool {
        matches!(self, Self::Generating { .. })
    }
}
