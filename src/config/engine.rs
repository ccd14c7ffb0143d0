//! Decision engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Voting and timing parameters for the decision engine
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Share of total registered weight one side needs to win, in (0, 1]
    #[serde(default = "default_voting_threshold")]
    pub voting_threshold: f64,

    /// How long a decision stays open, in milliseconds
    #[serde(default = "default_consensus_timeout_ms")]
    pub consensus_timeout_ms: u64,

    /// Upper bound on an approval action, in milliseconds (0 = unbounded)
    #[serde(default = "default_action_timeout_ms")]
    pub action_timeout_ms: u64,

    /// How often the timeout sweeper runs, in milliseconds
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl EngineConfig {
    pub fn consensus_timeout(&self) -> Duration {
        Duration::from_millis(self.consensus_timeout_ms)
    }

    /// `None` when actions may run without a time limit.
    pub fn action_timeout(&self) -> Option<Duration> {
        (self.action_timeout_ms > 0).then(|| Duration::from_millis(self.action_timeout_ms))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Builder-style override of the voting threshold.
    pub fn with_voting_threshold(mut self, threshold: f64) -> Self {
        self.voting_threshold = threshold;
        self
    }

    /// Builder-style override of the consensus timeout.
    pub fn with_consensus_timeout(mut self, timeout: Duration) -> Self {
        self.consensus_timeout_ms = millis(timeout);
        self
    }

    /// Builder-style override of the action timeout (zero disables it).
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout_ms = millis(timeout);
        self
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.voting_threshold > 0.0 && self.voting_threshold <= 1.0) {
            return Err(ValidationError::InvalidVotingThreshold(self.voting_threshold));
        }
        if self.consensus_timeout_ms == 0 {
            return Err(ValidationError::InvalidConsensusTimeout);
        }
        if self.sweep_interval_ms == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            voting_threshold: default_voting_threshold(),
            consensus_timeout_ms: default_consensus_timeout_ms(),
            action_timeout_ms: default_action_timeout_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn default_voting_threshold() -> f64 {
    0.6
}

fn default_consensus_timeout_ms() -> u64 {
    30_000
}

fn default_action_timeout_ms() -> u64 {
    10_000
}

fn default_sweep_interval_ms() -> u64 {
    1_000
}
