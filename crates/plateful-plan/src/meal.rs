//! The meal-plan shape and its validator
//!
//! One source of truth for what a generated plan looks like: the validator
//! that checks model output and the strict-mode JSON schema sent upstream
//! are both derived from these types.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Number of meals in a daily plan: breakfast, lunch, dinner
pub const MEALS_PER_PLAN: usize = 3;

/// A candidate plan failed structural validation
#[derive(Debug, Error)]
#[error("invalid meal plan at {path}: {message}")]
pub struct SchemaError {
    /// Where in the candidate the problem is (e.g. `meals[1].time`)
    pub path: String,
    /// What was wrong
    pub message: String,
}

impl SchemaError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// One ingredient with a human-readable amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Amount, e.g. `"50g"` or `"2 tbsp"`
    pub amount: String,
}

/// A single meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Full name including the meal slot, e.g. `"Breakfast: oatmeal"`
    pub name: String,
    /// Ordered ingredient list
    pub ingredients: Vec<Ingredient>,
    /// Ordered preparation steps
    pub steps: Vec<String>,
    /// Estimated preparation time in minutes
    pub time: u32,
}

/// A full day of meals, immutable once validated
///
/// Always exactly three meals, semantically breakfast, lunch, dinner.
/// On the wire this is a plain 3-element JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    meals: [Meal; MEALS_PER_PLAN],
}

impl MealPlan {
    /// Validate an untyped candidate into a plan
    ///
    /// Pure, no side effects. Fails if the candidate is not an array of
    /// exactly three well-formed meals.
    pub fn validate(candidate: &Value) -> Result<Self, SchemaError> {
        let meals: Vec<Meal> = serde_json::from_value(candidate.clone())
            .map_err(|e| SchemaError::new("meals", format!("malformed structure: {e}")))?;

        if meals.len() != MEALS_PER_PLAN {
            return Err(SchemaError::new(
                "meals",
                format!("expected exactly {MEALS_PER_PLAN} meals, got {}", meals.len()),
            ));
        }

        for (i, meal) in meals.iter().enumerate() {
            validate_meal(meal, i)?;
        }

        let meals: [Meal; MEALS_PER_PLAN] = meals
            .try_into()
            .map_err(|_| SchemaError::new("meals", "expected exactly 3 meals"))?;

        Ok(Self { meals })
    }

    /// The three meals in order
    pub const fn meals(&self) -> &[Meal; MEALS_PER_PLAN] {
        &self.meals
    }

    /// First meal of the day
    pub const fn breakfast(&self) -> &Meal {
        &self.meals[0]
    }

    /// Midday meal
    pub const fn lunch(&self) -> &Meal {
        &self.meals[1]
    }

    /// Evening meal
    pub const fn dinner(&self) -> &Meal {
        &self.meals[2]
    }
}

fn validate_meal(meal: &Meal, index: usize) -> Result<(), SchemaError> {
    if meal.name.trim().is_empty() {
        return Err(SchemaError::new(
            format!("meals[{index}].name"),
            "meal name must not be empty",
        ));
    }

    for (j, ingredient) in meal.ingredients.iter().enumerate() {
        if ingredient.name.trim().is_empty() {
            return Err(SchemaError::new(
                format!("meals[{index}].ingredients[{j}].name"),
                "ingredient name must not be empty",
            ));
        }
        if ingredient.amount.trim().is_empty() {
            return Err(SchemaError::new(
                format!("meals[{index}].ingredients[{j}].amount"),
                "ingredient amount must not be empty",
            ));
        }
    }

    for (j, step) in meal.steps.iter().enumerate() {
        if step.trim().is_empty() {
            return Err(SchemaError::new(
                format!("meals[{index}].steps[{j}]"),
                "step must not be empty",
            ));
        }
    }

    if meal.time == 0 {
        return Err(SchemaError::new(
            format!("meals[{index}].time"),
            "preparation time must be a positive number of minutes",
        ));
    }

    Ok(())
}

/// The strict-mode JSON schema for a generated plan
///
/// Object-wrapped because strict mode requires a top-level object; the
/// `meals` property carries the 3-meal array the validator checks.
pub fn meal_plan_schema() -> Value {
    let meal_schema = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "amount": { "type": "string" },
                    },
                    "required": ["name", "amount"],
                    "additionalProperties": false,
                },
            },
            "steps": { "type": "array", "items": { "type": "string" } },
            "time": { "type": "integer" },
        },
        "required": ["name", "ingredients", "steps", "time"],
        "additionalProperties": false,
    });

    json!({
        "type": "object",
        "properties": {
            "meals": {
                "type": "array",
                "items": meal_schema,
                "minItems": MEALS_PER_PLAN,
                "maxItems": MEALS_PER_PLAN,
            },
        },
        "required": ["meals"],
        "additionalProperties": false,
    })
}
