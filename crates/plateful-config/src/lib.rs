//! Configuration for the Plateful server
//!
//! Loaded from a TOML file with `{{ env.VAR }}` placeholder expansion so
//! secrets stay out of the config file itself.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod env;
pub mod llm;
pub mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use llm::LlmConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

/// Root configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream LLM settings
    pub llm: LlmConfig,
    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
