//! Outbound notifications sent to participants.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DecisionId, ParticipantId, Timestamp};

use super::{Decision, DecisionStatus, VoteRecord};

/// Summary of an open decision, sent to eligible participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalNotice {
    pub id: DecisionId,
    pub title: String,
    pub description: String,
    pub timeout_at: Timestamp,
}

/// Message delivered through a `NotificationSink`.
///
/// Serialized with a `type` tag of `decision_proposal` or `decision_result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionNotification {
    /// A new decision is open for voting.
    DecisionProposal { decision: ProposalNotice },

    /// A decision reached a terminal status.
    DecisionResult {
        decision_id: DecisionId,
        result: DecisionStatus,
        votes: Vec<(ParticipantId, VoteRecord)>,
    },
}

impl DecisionNotification {
    pub fn proposal(decision: &Decision) -> Self {
        DecisionNotification::DecisionProposal {
            decision: ProposalNotice {
                id: *decision.id(),
                title: decision.proposal().title().to_string(),
                description: decision.proposal().description().to_string(),
                timeout_at: *decision.timeout_at(),
            },
        }
    }

    pub fn result(decision: &Decision) -> Self {
        DecisionNotification::DecisionResult {
            decision_id: *decision.id(),
            result: decision.status(),
            votes: decision.vote_entries(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DecisionNotification::DecisionProposal { .. } => "decision_proposal",
            DecisionNotification::DecisionResult { .. } => "decision_result",
        }
    }

    pub fn decision_id(&self) -> DecisionId {
        match self {
            DecisionNotification::DecisionProposal { decision } => decision.id,
            DecisionNotification::DecisionResult { decision_id, .. } => *decision_id,
        }
    }
}
