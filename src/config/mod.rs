//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PARCEL_SCOUT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use parcel_scout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Running the {} agent", config.agent.variant);
//! ```

mod agent;
mod ai;
mod error;
mod log;
mod research;

pub use agent::AgentConfig;
pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use log::LogConfig;
pub use research::ResearchConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model provider configuration (Anthropic/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Agent variant and overrides
    #[serde(default)]
    pub agent: AgentConfig,

    /// Log output format
    #[serde(default)]
    pub log: LogConfig,

    /// Capability fixtures
    #[serde(default)]
    pub research: ResearchConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PARCEL_SCOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PARCEL_SCOUT__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    /// - `PARCEL_SCOUT__AGENT__VARIANT=thorough` -> `agent.variant = "thorough"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PARCEL_SCOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.agent.validate()?;
        self.research.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "PARCEL_SCOUT__AI__ANTHROPIC_API_KEY",
        "PARCEL_SCOUT__AI__OPENAI_API_KEY",
        "PARCEL_SCOUT__AI__PRIMARY_PROVIDER",
        "PARCEL_SCOUT__AI__FALLBACK_PROVIDER",
        "PARCEL_SCOUT__AI__TIMEOUT_SECS",
        "PARCEL_SCOUT__AGENT__VARIANT",
        "PARCEL_SCOUT__AGENT__MIN_CONFIDENCE_THRESHOLD",
        "PARCEL_SCOUT__AGENT__MAX_ITERATIONS",
        "PARCEL_SCOUT__LOG__JSON",
    ];

    fn set_minimal_env() {
        env::set_var("PARCEL_SCOUT__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-xxx"));
        assert_eq!(config.agent.variant, "standard");
        assert!(!config.log.json);
    }

    #[test]
    fn test_validate_minimal_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_agent_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PARCEL_SCOUT__AGENT__VARIANT", "thorough");
        env::set_var("PARCEL_SCOUT__AGENT__MIN_CONFIDENCE_THRESHOLD", "85");
        env::set_var("PARCEL_SCOUT__AGENT__MAX_ITERATIONS", "8");
        let result = AppConfig::load();
        clear_env();

        let variant = result.unwrap().agent.variant().unwrap();
        assert_eq!(variant.name, "thorough");
        assert_eq!(variant.min_confidence_threshold.value(), 85);
        assert_eq!(variant.max_iterations, 8);
    }

    #[test]
    fn test_fallback_and_json_logging() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PARCEL_SCOUT__AI__OPENAI_API_KEY", "sk-xxx");
        env::set_var("PARCEL_SCOUT__AI__FALLBACK_PROVIDER", "openai");
        env::set_var("PARCEL_SCOUT__LOG__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.fallback_provider, Some(AiProvider::OpenAI));
        assert!(config.log.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_keys_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::NoAiProviderConfigured)
        ));
    }
}
