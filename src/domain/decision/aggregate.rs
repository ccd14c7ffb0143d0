//! Decision aggregate - a voting session wrapped around a proposal.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{DecisionId, ParticipantId, StateMachine, Timestamp};

use super::{DecisionError, DecisionStatus, Proposal, VoteRecord, VoteTally};

/// Outcome of running the side effects of an approved decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Failure text from the approval action, if it failed.
    pub action_error: Option<String>,
    /// One entry per failing callback, in callback order.
    pub callback_errors: Vec<String>,
}

impl ExecutionReport {
    pub fn is_clean(&self) -> bool {
        self.action_error.is_none() && self.callback_errors.is_empty()
    }
}

/// A decision and its votes.
///
/// # Invariants
///
/// - at most one vote per participant (re-voting replaces the old vote)
/// - `timeout_at = started_at + consensus timeout`
/// - `ended_at` is set exactly when `status` becomes terminal
/// - once terminal, votes and status never change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    id: DecisionId,
    proposal: Proposal,
    status: DecisionStatus,
    votes: BTreeMap<ParticipantId, VoteRecord>,
    started_at: Timestamp,
    timeout_at: Timestamp,
    ended_at: Option<Timestamp>,
    execution_error: Option<String>,
    callback_errors: Vec<String>,
}

impl Decision {
    /// Open a new decision for voting.
    pub fn open(id: DecisionId, proposal: Proposal, now: Timestamp, timeout: Duration) -> Self {
        Self {
            id,
            proposal,
            status: DecisionStatus::Voting,
            votes: BTreeMap::new(),
            started_at: now,
            timeout_at: now.plus(timeout),
            ended_at: None,
            execution_error: None,
            callback_errors: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DecisionId {
        &self.id
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    pub fn status(&self) -> DecisionStatus {
        self.status
    }

    pub fn votes(&self) -> &BTreeMap<ParticipantId, VoteRecord> {
        &self.votes
    }

    /// Votes as owned pairs, ordered by participant id.
    pub fn vote_entries(&self) -> Vec<(ParticipantId, VoteRecord)> {
        self.votes
            .iter()
            .map(|(id, vote)| (id.clone(), vote.clone()))
            .collect()
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn timeout_at(&self) -> &Timestamp {
        &self.timeout_at
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    pub fn execution_error(&self) -> Option<&str> {
        self.execution_error.as_deref()
    }

    pub fn callback_errors(&self) -> &[String] {
        &self.callback_errors
    }

    pub fn tally(&self) -> VoteTally {
        VoteTally::from_votes(self.votes.values())
    }

    /// Deadline has strictly passed.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.timeout_at)
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn time_remaining(&self, now: &Timestamp) -> std::time::Duration {
        self.timeout_at
            .duration_since(now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    /// Wall time from opening to resolution, for terminal decisions.
    pub fn elapsed(&self) -> Option<Duration> {
        self.ended_at.map(|end| end.duration_since(&self.started_at))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a vote, replacing any earlier vote from the same participant.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the decision is no longer voting
    pub fn record_vote(
        &mut self,
        participant_id: ParticipantId,
        vote: VoteRecord,
    ) -> Result<(), DecisionError> {
        self.ensure_open()?;
        self.votes.insert(participant_id, vote);
        Ok(())
    }

    /// Decide which terminal status, if any, the decision has reached.
    ///
    /// Approval is checked before rejection, so when both ratios meet the
    /// threshold the decision is approved. The deadline only matters when
    /// neither side has reached the threshold.
    pub fn evaluate(&self, total_weight: f64, threshold: f64, now: &Timestamp) -> Option<DecisionStatus> {
        if !self.status.is_open() {
            return None;
        }

        let tally = self.tally();
        if tally.approve_ratio(total_weight) >= threshold {
            Some(DecisionStatus::Approved)
        } else if tally.reject_ratio(total_weight) >= threshold {
            Some(DecisionStatus::Rejected)
        } else if self.is_expired(now) {
            Some(DecisionStatus::Timeout)
        } else {
            None
        }
    }

    /// Move to a terminal status and stamp the end time.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the decision is already terminal
    pub fn resolve(&mut self, outcome: DecisionStatus, now: Timestamp) -> Result<(), DecisionError> {
        self.status = self
            .status
            .transition_to(outcome)
            .map_err(|_| DecisionError::invalid_state(self.id, self.status))?;
        self.ended_at = Some(now);
        Ok(())
    }

    /// Attach the result of running approval side effects.
    pub fn record_execution(&mut self, report: &ExecutionReport) {
        self.execution_error = report.action_error.clone();
        self.callback_errors = report.callback_errors.clone();
    }

    fn ensure_open(&self) -> Result<(), DecisionError> {
        if self.status.is_open() {
            Ok(())
        } else {
            Err(DecisionError::invalid_state(self.id, self.status))
        }
    }
}
