use serde::{Deserialize, Serialize};

/// Entry in the upstream models listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    /// Model identifier
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum context window in tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
    /// Pricing information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricing>,
}

/// Per-token pricing as decimal strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Price per prompt token
    pub prompt: String,
    /// Price per completion token
    pub completion: String,
}
