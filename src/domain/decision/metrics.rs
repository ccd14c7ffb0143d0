//! Read-only projections over engine state.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{DecisionId, ParticipantId, Percentage, Timestamp};

use super::{Decision, DecisionStatus, VoteRecord};

/// How many registered participants have voted on a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionProgress {
    pub voted: usize,
    pub total: usize,
    pub percentage: Percentage,
}

impl DecisionProgress {
    pub fn new(voted: usize, total: usize) -> Self {
        Self {
            voted,
            total,
            percentage: Percentage::of(voted, total),
        }
    }
}

/// Snapshot of a single decision for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionStatusView {
    pub id: DecisionId,
    pub status: DecisionStatus,
    pub votes: Vec<(ParticipantId, VoteRecord)>,
    pub progress: DecisionProgress,
    pub time_remaining: Duration,
    pub execution_error: Option<String>,
    pub callback_errors: Vec<String>,
}

impl DecisionStatusView {
    pub fn project(decision: &Decision, registered: usize, now: &Timestamp) -> Self {
        Self {
            id: *decision.id(),
            status: decision.status(),
            votes: decision.vote_entries(),
            progress: DecisionProgress::new(decision.vote_count(), registered),
            time_remaining: decision.time_remaining(now),
            execution_error: decision.execution_error().map(str::to_string),
            callback_errors: decision.callback_errors().to_vec(),
        }
    }
}

/// Returned from a successful vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub decision_id: DecisionId,
    pub status: DecisionStatus,
    pub progress: DecisionProgress,
    pub time_remaining: Duration,
}

/// Aggregate figures across the registry, live decisions and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub active_participants: usize,
    pub active_decisions: usize,
    pub completed_decisions: usize,
    pub approval_rate: Percentage,
    pub avg_decision_time: Duration,
}

impl EngineMetrics {
    pub fn compute(active_participants: usize, active_decisions: usize, history: &[Decision]) -> Self {
        let completed = history.len();
        let approved = history
            .iter()
            .filter(|d| d.status() == DecisionStatus::Approved)
            .count();

        Self {
            active_participants,
            active_decisions,
            completed_decisions: completed,
            approval_rate: Percentage::of(approved, completed),
            avg_decision_time: average_elapsed(history),
        }
    }
}

fn average_elapsed(history: &[Decision]) -> Duration {
    if history.is_empty() {
        return Duration::ZERO;
    }
    let total_ms: i64 = history
        .iter()
        .filter_map(Decision::elapsed)
        .map(|elapsed| elapsed.num_milliseconds().max(0))
        .sum();
    let avg = (total_ms as f64 / history.len() as f64).round() as u64;
    Duration::from_millis(avg)
}
