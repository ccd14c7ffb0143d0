//! DecisionStatus enum for tracking the lifecycle of a decision.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a decision.
///
/// `Voting` is the only open state; the other three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Voting,
    Approved,
    Rejected,
    Timeout,
}

impl DecisionStatus {
    /// Returns true while votes are still accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, DecisionStatus::Voting)
    }
}

impl StateMachine for DecisionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use DecisionStatus::*;
        match self {
            Voting => vec![Approved, Rejected, Timeout],
            Approved | Rejected | Timeout => vec![],
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionStatus::Voting => "voting",
            DecisionStatus::Approved => "approved",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::Timeout => "timeout",
        };
        write!(f, "{}", s)
    }
}
