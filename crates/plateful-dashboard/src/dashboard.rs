//! The dashboard state machine

use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use plateful_core::UserContext;
use plateful_plan::{ActionType, AnalyticsSink, MealPlan, PlanError, StoreError};
use tokio_util::sync::CancellationToken;

use crate::backend::PlanBackend;
use crate::state::GenerationState;

/// How a dashboard operation resolved
///
/// Authentication failures are not a renderable state; the caller routes
/// the user back to sign-in instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation finished and the state reflects the result
    Done,
    /// Credentials were rejected; redirect to sign-in
    AuthRequired,
}

/// Per-session orchestrator for one user's plan view
///
/// Holds the current [`GenerationState`] and a cancellation handle for the
/// in-flight generation. Starting a new generation replaces the handle, so
/// a stale cancel can never abort a newer attempt.
pub struct Dashboard {
    backend: Arc<dyn PlanBackend>,
    analytics: Arc<dyn AnalyticsSink>,
    ctx: UserContext,
    state: Mutex<GenerationState>,
    cancel: Mutex<CancellationToken>,
}

impl Dashboard {
    /// A fresh dashboard in the `Empty` state
    pub fn new(
        backend: Arc<dyn PlanBackend>,
        analytics: Arc<dyn AnalyticsSink>,
        ctx: UserContext,
    ) -> Self {
        Self {
            backend,
            analytics,
            ctx,
            state: Mutex::new(GenerationState::Empty),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> GenerationState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fetch the user's existing plan, e.g. on first render
    ///
    /// A user without a plan lands in `Empty`, never in `Error`.
    pub async fn load_current(&self) -> Outcome {
        match self.backend.current_plan(&self.ctx).await {
            Ok(Some(plan)) => {
                self.set_state(GenerationState::Loaded { plan });
                Outcome::Done
            }
            Ok(None) | Err(PlanError::NotFound) => {
                self.set_state(GenerationState::Empty);
                Outcome::Done
            }
            Err(PlanError::Unauthorized) => Outcome::AuthRequired,
            Err(error) => {
                tracing::warn!(user_id = %self.ctx.user_id, error = %error, "failed to load current plan");
                self.set_state(GenerationState::Error {
                    message: error.to_string(),
                    retryable: error.user_retryable(),
                    previous_plan: None,
                });
                Outcome::Done
            }
        }
    }

    /// Run one generation to completion, cancellation, or error
    ///
    /// The previously loaded plan (if any) is carried through `Generating`
    /// and restored verbatim when the attempt is cancelled; on failure it
    /// stays available beneath the error.
    pub async fn generate_plan(&self, regeneration: bool) -> Outcome {
        let previous_plan = self.state().fallback_plan();

        let token = CancellationToken::new();
        *self.cancel.lock().unwrap_or_else(|e| e.into_inner()) = token.clone();

        self.set_state(GenerationState::Generating {
            started_at: Timestamp::now(),
            previous_plan: previous_plan.clone(),
        });

        // The backend call runs detached so cancellation only stops
        // waiting: the service still settles its plan record, otherwise a
        // stranded pending row would block every later generation.
        let backend = self.backend.clone();
        let ctx = self.ctx.clone();
        let generation = tokio::spawn(async move { backend.generate(&ctx, regeneration).await });

        let result = tokio::select! {
            () = token.cancelled() => {
                tracing::info!(user_id = %self.ctx.user_id, "plan generation cancelled");
                self.restore(previous_plan);
                return Outcome::Done;
            }
            joined = generation => joined.unwrap_or_else(|e| {
                Err(PlanError::Store(StoreError(format!("generation task failed: {e}"))))
            }),
        };

        // A cancel that raced the completion wins; the superseded result
        // must not reach the screen.
        if token.is_cancelled() {
            self.restore(previous_plan);
            return Outcome::Done;
        }

        match result {
            Ok(plan) => {
                self.set_state(GenerationState::Loaded { plan });
                let action = if regeneration {
                    ActionType::PlanRegenerated
                } else {
                    ActionType::PlanGenerated
                };
                self.analytics.log_event(&self.ctx.user_id, action, None).await;
                Outcome::Done
            }
            Err(PlanError::Unauthorized) => {
                self.restore(previous_plan);
                Outcome::AuthRequired
            }
            Err(error) => {
                self.set_state(GenerationState::Error {
                    message: error.to_string(),
                    retryable: error.user_retryable(),
                    previous_plan,
                });
                Outcome::Done
            }
        }
    }

    /// Abort the in-flight generation, if any
    ///
    /// No-op when nothing is generating. The aborted view falls back to
    /// the pre-generation plan, never to an error.
    pub fn cancel_generation(&self) {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cancel();
    }

    fn restore(&self, previous_plan: Option<MealPlan>) {
        self.set_state(match previous_plan {
            Some(plan) => GenerationState::Loaded { plan },
            None => GenerationState::Empty,
        });
    }

    fn set_state(&self, next: GenerationState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use plateful_plan::memory::MemoryAnalytics;
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;

    fn plan(tag: &str) -> MealPlan {
        let meal = |name: &str| {
            json!({
                "name": name,
                "ingredients": [{ "name": "Oats", "amount": "50g" }],
                "steps": ["Combine"],
                "time": 10,
            })
        };
        MealPlan::validate(&json!([
            meal(&format!("Breakfast {tag}")),
            meal(&format!("Lunch {tag}")),
            meal(&format!("Dinner {tag}")),
        ]))
        .unwrap()
    }

    /// Scripted backend: pops one response per call, optionally gated on a
    /// [`Notify`] so tests control when the generation "completes".
    struct StubBackend {
        current: Mutex<Option<Result<Option<MealPlan>, PlanError>>>,
        generate: Mutex<Vec<Result<MealPlan, PlanError>>>,
        gate: Option<Arc<Notify>>,
        calls: AtomicU32,
        completed: AtomicU32,
    }

    impl StubBackend {
        fn generating(results: Vec<Result<MealPlan, PlanError>>) -> Self {
            Self {
                current: Mutex::new(None),
                generate: Mutex::new(results),
                gate: None,
                calls: AtomicU32::new(0),
                completed: AtomicU32::new(0),
            }
        }

        fn gated(results: Vec<Result<MealPlan, PlanError>>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::generating(results)
            }
        }

        fn with_current(current: Result<Option<MealPlan>, PlanError>) -> Self {
            Self {
                current: Mutex::new(Some(current)),
                ..Self::generating(Vec::new())
            }
        }
    }

    #[async_trait]
    impl PlanBackend for StubBackend {
        async fn current_plan(&self, _ctx: &UserContext) -> Result<Option<MealPlan>, PlanError> {
            self.current.lock().unwrap().take().expect("unexpected current_plan call")
        }

        async fn generate(
            &self,
            _ctx: &UserContext,
            _regeneration: bool,
        ) -> Result<MealPlan, PlanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let result = self.generate.lock().unwrap().remove(0);
            self.completed.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    fn dashboard(backend: StubBackend) -> (Arc<Dashboard>, Arc<MemoryAnalytics>) {
        let analytics = Arc::new(MemoryAnalytics::default());
        let dashboard = Arc::new(Dashboard::new(
            Arc::new(backend),
            analytics.clone(),
            UserContext::new("user-1"),
        ));
        (dashboard, analytics)
    }

    #[tokio::test]
    async fn generation_from_empty_loads_plan() {
        let (dashboard, analytics) = dashboard(StubBackend::generating(vec![Ok(plan("a"))]));

        assert_eq!(dashboard.generate_plan(false).await, Outcome::Done);

        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("a")),
            other => panic!("expected Loaded, got {other:?}"),
        }
        let events = analytics.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, ActionType::PlanGenerated);
    }

    #[tokio::test]
    async fn regeneration_logs_regenerated_action() {
        let (dashboard, analytics) = dashboard(StubBackend::generating(vec![Ok(plan("b"))]));
        *dashboard.state.lock().unwrap() = GenerationState::Loaded { plan: plan("a") };

        dashboard.generate_plan(true).await;

        assert_eq!(analytics.events()[0].action, ActionType::PlanRegenerated);
    }

    #[tokio::test]
    async fn failed_regeneration_keeps_previous_plan() {
        let (dashboard, analytics) =
            dashboard(StubBackend::generating(vec![Err(PlanError::Unavailable)]));
        *dashboard.state.lock().unwrap() = GenerationState::Loaded { plan: plan("a") };

        assert_eq!(dashboard.generate_plan(true).await, Outcome::Done);

        match dashboard.state() {
            GenerationState::Error {
                retryable,
                previous_plan,
                ..
            } => {
                assert!(retryable);
                assert_eq!(previous_plan, Some(plan("a")));
            }
            other => panic!("expected Error, got {other:?}"),
        }
        assert!(analytics.events().is_empty());
    }

    #[tokio::test]
    async fn missing_preferences_is_not_retryable() {
        let (dashboard, _) =
            dashboard(StubBackend::generating(vec![Err(PlanError::MissingPreferences)]));

        dashboard.generate_plan(false).await;

        match dashboard.state() {
            GenerationState::Error {
                retryable,
                previous_plan,
                ..
            } => {
                assert!(!retryable);
                assert_eq!(previous_plan, None);
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn retry_after_error_reuses_fallback_plan() {
        let (dashboard, _) = dashboard(StubBackend::generating(vec![
            Err(PlanError::Timeout),
            Err(PlanError::Timeout),
        ]));
        *dashboard.state.lock().unwrap() = GenerationState::Loaded { plan: plan("a") };

        dashboard.generate_plan(true).await;
        dashboard.generate_plan(true).await;

        // The original plan survives consecutive failures
        match dashboard.state() {
            GenerationState::Error { previous_plan, .. } => {
                assert_eq!(previous_plan, Some(plan("a")));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_restores_previous_plan() {
        let gate = Arc::new(Notify::new());
        let (dashboard, analytics) =
            dashboard(StubBackend::gated(vec![Ok(plan("b"))], gate.clone()));
        *dashboard.state.lock().unwrap() = GenerationState::Loaded { plan: plan("a") };

        let running = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.generate_plan(true).await }
        });

        // Wait until the generation is actually in flight
        while !dashboard.state().is_generating() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        dashboard.cancel_generation();
        assert_eq!(running.await.unwrap(), Outcome::Done);

        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("a")),
            other => panic!("expected Loaded, got {other:?}"),
        }

        // The aborted attempt's result arrives late and must be ignored
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(5)).await;
        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("a")),
            other => panic!("expected Loaded, got {other:?}"),
        }
        assert!(analytics.events().is_empty());
    }

    #[tokio::test]
    async fn cancel_from_empty_returns_to_empty() {
        let gate = Arc::new(Notify::new());
        let (dashboard, _) = dashboard(StubBackend::gated(vec![Ok(plan("a"))], gate));

        let running = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.generate_plan(false).await }
        });
        while !dashboard.state().is_generating() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        dashboard.cancel_generation();
        running.await.unwrap();

        assert!(matches!(dashboard.state(), GenerationState::Empty));
    }

    #[tokio::test]
    async fn cancelled_generation_still_runs_to_completion() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(StubBackend::gated(
            vec![Ok(plan("a")), Ok(plan("b"))],
            gate.clone(),
        ));
        let analytics = Arc::new(MemoryAnalytics::default());
        let dashboard = Arc::new(Dashboard::new(
            backend.clone(),
            analytics,
            UserContext::new("user-1"),
        ));

        let running = tokio::spawn({
            let dashboard = dashboard.clone();
            async move { dashboard.generate_plan(false).await }
        });
        while !dashboard.state().is_generating() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        dashboard.cancel_generation();
        assert_eq!(running.await.unwrap(), Outcome::Done);
        assert!(matches!(dashboard.state(), GenerationState::Empty));

        // Cancellation only stopped the wait; the detached call finishes
        // once unblocked instead of being dropped mid-flight
        gate.notify_one();
        while backend.completed.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // The next generation proceeds normally after the abort
        gate.notify_one();
        assert_eq!(dashboard.generate_plan(false).await, Outcome::Done);
        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("b")),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_while_idle_does_not_abort_next_generation() {
        let (dashboard, _) = dashboard(StubBackend::generating(vec![Ok(plan("a"))]));

        // Stale cancel before any generation starts
        dashboard.cancel_generation();

        assert_eq!(dashboard.generate_plan(false).await, Outcome::Done);
        assert!(matches!(dashboard.state(), GenerationState::Loaded { .. }));
    }

    #[tokio::test]
    async fn unauthorized_redirects_instead_of_erroring() {
        let (dashboard, _) =
            dashboard(StubBackend::generating(vec![Err(PlanError::Unauthorized)]));
        *dashboard.state.lock().unwrap() = GenerationState::Loaded { plan: plan("a") };

        assert_eq!(dashboard.generate_plan(true).await, Outcome::AuthRequired);

        // Auth failures never become a local error state
        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("a")),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_current_with_no_plan_is_empty() {
        let (dashboard, _) = dashboard(StubBackend::with_current(Ok(None)));
        assert_eq!(dashboard.load_current().await, Outcome::Done);
        assert!(matches!(dashboard.state(), GenerationState::Empty));
    }

    #[tokio::test]
    async fn load_current_with_existing_plan() {
        let (dashboard, _) = dashboard(StubBackend::with_current(Ok(Some(plan("a")))));
        assert_eq!(dashboard.load_current().await, Outcome::Done);
        match dashboard.state() {
            GenerationState::Loaded { plan: loaded } => assert_eq!(loaded, plan("a")),
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_current_unauthorized_redirects() {
        let (dashboard, _) =
            dashboard(StubBackend::with_current(Err(PlanError::Unauthorized)));
        assert_eq!(dashboard.load_current().await, Outcome::AuthRequired);
    }
}
