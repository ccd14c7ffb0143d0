//! Structured logging initialisation.
//!
//! Two output formats are supported:
//! - [`LogFormat::Pretty`] - human-readable lines for development
//! - [`LogFormat::Json`] - newline-delimited JSON for log aggregation
//!
//! `RUST_LOG` overrides the configured filter when set.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig, ValidationError};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log configuration: {0}")]
    InvalidFilter(#[from] ValidationError),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter()?;

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
    }

    Ok(())
}
