//! Prompt construction for plan generation
//!
//! The system prompt fixes the output contract; the user prompt serializes
//! the preferences into natural-language constraints. Anything the model
//! must never include (allergens) is stated verbatim.

use crate::preferences::UserPreferences;

/// System prompt fixing the 3-meal JSON-only output contract
pub const SYSTEM_PROMPT: &str = "\
You are an expert dietitian. Your task is to generate healthy, tasty meal \
plans for a single day.
Always respond with a JSON array of exactly 3 meals (breakfast, lunch, dinner).
Every meal must have:
- name: full name including the meal slot (e.g. \"Breakfast: oatmeal with fruit\")
- ingredients: array of ingredients with \"name\" and \"amount\" fields (use metric units: g, ml, pcs)
- steps: array of preparation steps
- time: estimated preparation time in minutes (whole number)
Use realistic portions. Return ONLY valid JSON with no extra commentary.";

/// Build the user prompt from preferences
pub fn user_prompt(preferences: &UserPreferences) -> String {
    let mut parts = vec![
        "Generate a plan of 3 meals (breakfast, lunch, dinner) for a person with the following preferences:".to_owned(),
    ];

    parts.push(format!(
        "- Health goal: {}",
        preferences.health_goal.describe()
    ));
    parts.push(format!("- Diet: {}", preferences.diet_type.describe()));
    parts.push(format!(
        "- Activity level: {}/5",
        preferences.activity_level
    ));

    if !preferences.allergies.is_empty() {
        parts.push(format!(
            "- Allergies (must not appear in any ingredient): {}",
            preferences.allergies.join(", ")
        ));
    }

    if !preferences.disliked_products.is_empty() {
        parts.push(format!(
            "- Disliked products (avoid): {}",
            preferences.disliked_products.join(", ")
        ));
    }

    parts.push(
        "\nResponse format (ONLY JSON, no extra text):\n\
         [{\"name\":\"Breakfast: ...\",\"ingredients\":[{\"name\":\"...\",\"amount\":\"...\"}],\"steps\":[\"...\"],\"time\":15},\
         {\"name\":\"Lunch: ...\",\"ingredients\":[...],\"steps\":[...],\"time\":30},\
         {\"name\":\"Dinner: ...\",\"ingredients\":[...],\"steps\":[...],\"time\":20}]"
            .to_owned(),
    );

    parts.join("\n")
}
