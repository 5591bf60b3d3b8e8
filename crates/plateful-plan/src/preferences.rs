use serde::{Deserialize, Serialize};

/// What the user wants out of their diet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthGoal {
    LoseWeight,
    GainWeight,
    MaintainWeight,
    HealthyEating,
    BoostEnergy,
}

impl HealthGoal {
    /// Natural-language phrasing for the prompt
    pub const fn describe(self) -> &'static str {
        match self {
            Self::LoseWeight => "losing weight",
            Self::GainWeight => "gaining weight",
            Self::MaintainWeight => "maintaining current weight",
            Self::HealthyEating => "eating healthier",
            Self::BoostEnergy => "boosting energy levels",
        }
    }
}

/// Dietary restriction profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietType {
    Standard,
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl DietType {
    /// Natural-language phrasing for the prompt
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Standard => "standard (no restrictions)",
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten-free",
        }
    }
}

/// Dietary preferences a plan is generated from
///
/// Mirrors the preferences store row; field casing matches the stored
/// representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Health goal
    pub health_goal: HealthGoal,
    /// Diet type
    pub diet_type: DietType,
    /// Activity level on a 1–5 scale
    pub activity_level: u8,
    /// Allergens to exclude entirely
    #[serde(default)]
    pub allergies: Vec<String>,
    /// Products the user dislikes
    #[serde(default)]
    pub disliked_products: Vec<String>,
}
