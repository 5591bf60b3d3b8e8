use serde::Deserialize;

/// Logging configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Default log filter, overridable via `RUST_LOG`
    #[serde(default = "default_filter")]
    pub log_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_owned()
}
