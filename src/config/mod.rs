//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `COLLECTIVE_DECISION` prefix and nested values use double underscores as
//! separators. Every value has a default, so an empty environment is valid.
//!
//! # Example
//!
//! ```no_run
//! use collective_decision::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Voting threshold: {}", config.engine.voting_threshold);
//! ```

mod engine;
mod error;
mod logging;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Voting threshold and timing
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COLLECTIVE_DECISION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COLLECTIVE_DECISION__ENGINE__VOTING_THRESHOLD=0.75` -> `engine.voting_threshold = 0.75`
    /// - `COLLECTIVE_DECISION__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COLLECTIVE_DECISION")
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
        self.engine.validate()?;
        self.logging.validate()?;
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

    const VARS: [&str; 4] = [
        "COLLECTIVE_DECISION__ENGINE__VOTING_THRESHOLD",
        "COLLECTIVE_DECISION__ENGINE__CONSENSUS_TIMEOUT_MS",
        "COLLECTIVE_DECISION__LOGGING__FORMAT",
        "COLLECTIVE_DECISION__LOGGING__LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COLLECTIVE_DECISION__ENGINE__VOTING_THRESHOLD", "0.75");
        env::set_var("COLLECTIVE_DECISION__ENGINE__CONSENSUS_TIMEOUT_MS", "5000");
        env::set_var("COLLECTIVE_DECISION__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.voting_threshold, 0.75);
        assert_eq!(config.engine.consensus_timeout_ms, 5000);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("COLLECTIVE_DECISION__ENGINE__VOTING_THRESHOLD", "1.5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidVotingThreshold(1.5))
        );
    }
}
