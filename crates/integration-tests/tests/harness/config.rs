//! Builders wiring the service under test to a mock upstream

#![allow(dead_code)]

use std::sync::Arc;

use plateful_config::LlmConfig;
use plateful_llm::LlmClient;
use plateful_plan::memory::{MemoryAnalytics, MemoryPlanStore, MemoryPreferencesStore};
use plateful_plan::{DietType, HealthGoal, MealPlanGenerator, PlanService, UserPreferences};
use plateful_server::AppState;
use secrecy::SecretString;
use url::Url;

/// A client pointed at the mock with a fast retry policy
pub fn test_client(base_url: &str) -> LlmClient {
    let config = LlmConfig {
        api_key: SecretString::from("test-key"),
        base_url: Some(Url::parse(base_url).expect("valid mock url")),
        default_model: "openai/gpt-4o-mini".to_owned(),
        timeout_ms: 2_000,
        max_retries: 3,
        retry_delay_ms: 10,
        site_name: Some("Plateful".to_owned()),
        site_url: None,
    };

    LlmClient::from_config(&config)
}

/// Fully wired application state plus handles to the backing stores
pub struct TestApp {
    pub state: AppState,
    pub preferences: Arc<MemoryPreferencesStore>,
    pub plans: Arc<MemoryPlanStore>,
    pub analytics: Arc<MemoryAnalytics>,
}

/// Build the app state around a mock upstream
pub fn test_app(base_url: &str) -> TestApp {
    let client = test_client(base_url);
    let preferences = Arc::new(MemoryPreferencesStore::new());
    let plans = Arc::new(MemoryPlanStore::new());
    let analytics = Arc::new(MemoryAnalytics::new());

    let service = Arc::new(PlanService::new(
        MealPlanGenerator::new(client.clone()),
        preferences.clone(),
        plans.clone(),
    ));

    TestApp {
        state: AppState {
            plans: service,
            llm: Arc::new(client),
            analytics: analytics.clone(),
        },
        preferences,
        plans,
        analytics,
    }
}

/// Preferences used across the generation tests
pub fn sample_preferences() -> UserPreferences {
    UserPreferences {
        health_goal: HealthGoal::LoseWeight,
        diet_type: DietType::Vegan,
        activity_level: 3,
        allergies: vec!["Orzechy".to_owned()],
        disliked_products: vec![],
    }
}

/// A well-formed 3-meal plan as the assistant content string
pub fn sample_plan_content() -> String {
    let meal = |name: &str| {
        serde_json::json!({
            "name": name,
            "ingredients": [
                { "name": "Oats", "amount": "50g" },
                { "name": "Soy milk", "amount": "200ml" },
            ],
            "steps": ["Warm the milk", "Stir in the oats"],
            "time": 10,
        })
    };

    serde_json::json!([
        meal("Breakfast: oatmeal with berries"),
        meal("Lunch: lentil stew"),
        meal("Dinner: roasted vegetables"),
    ])
    .to_string()
}
