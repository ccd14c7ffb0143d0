//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Voting threshold must be greater than 0 and at most 1, got {0}")]
    InvalidVotingThreshold(f64),

    #[error("Consensus timeout must be greater than zero")]
    InvalidConsensusTimeout,

    #[error("Sweep interval must be greater than zero")]
    InvalidSweepInterval,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),
}
