//! Commands accepted by the decision engine.

use std::fmt;
use std::sync::Arc;

use crate::domain::decision::{Proposal, VoteChoice};
use crate::domain::foundation::{DecisionId, ParticipantId};
use crate::ports::DecisionAction;

/// Side effects run when a decision is approved.
///
/// Held by the engine alongside the decision and dropped once the decision
/// reaches a terminal status.
#[derive(Clone, Default)]
pub struct ApprovalHooks {
    pub action: Option<Arc<dyn DecisionAction>>,
    pub callbacks: Vec<Arc<dyn DecisionAction>>,
}

impl ApprovalHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the single approval action.
    pub fn with_action(mut self, action: Arc<dyn DecisionAction>) -> Self {
        self.action = Some(action);
        self
    }

    /// Append a result callback. Callbacks run in the order they were added.
    pub fn with_callback(mut self, callback: Arc<dyn DecisionAction>) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.callbacks.is_empty()
    }
}

impl fmt::Debug for ApprovalHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApprovalHooks")
            .field("action", &self.action.as_ref().map(|a| a.name().to_string()))
            .field(
                "callbacks",
                &self.callbacks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Command to open a new decision.
#[derive(Debug, Clone)]
pub struct ProposeDecisionCommand {
    pub proposal: Proposal,
    pub hooks: ApprovalHooks,
}

impl ProposeDecisionCommand {
    pub fn new(proposal: Proposal) -> Self {
        Self {
            proposal,
            hooks: ApprovalHooks::default(),
        }
    }

    pub fn with_action(mut self, action: Arc<dyn DecisionAction>) -> Self {
        self.hooks = self.hooks.with_action(action);
        self
    }

    pub fn with_callback(mut self, callback: Arc<dyn DecisionAction>) -> Self {
        self.hooks = self.hooks.with_callback(callback);
        self
    }
}

/// Command to cast (or replace) a participant's vote.
#[derive(Debug, Clone)]
pub struct CastVoteCommand {
    pub decision_id: DecisionId,
    pub participant_id: ParticipantId,
    pub choice: VoteChoice,
    pub reasoning: String,
}

impl CastVoteCommand {
    pub fn new(decision_id: DecisionId, participant_id: ParticipantId, choice: VoteChoice) -> Self {
        Self {
            decision_id,
            participant_id,
            choice,
            reasoning: String::new(),
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }
}
