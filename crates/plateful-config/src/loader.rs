use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    pub fn validate(&self) -> anyhow::Result<()> {
        use secrecy::ExposeSecret;

        if self.llm.api_key.expose_secret().is_empty() {
            anyhow::bail!("llm.api_key must not be empty");
        }

        if self.llm.timeout_ms == 0 {
            anyhow::bail!("llm.timeout_ms must be greater than zero");
        }

        if self.server.listen.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("server.listen is not a valid socket address: `{}`", self.server.listen);
        }

        Ok(())
    }
}
