//! Decision-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DecisionId, ErrorCode, ParticipantId, ValidationError};

use super::DecisionStatus;

/// Errors returned synchronously by decision engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// The referenced decision does not exist.
    #[error("Decision not found: {0}")]
    DecisionNotFound(DecisionId),

    /// The referenced participant is not registered.
    #[error("Participant not registered: {0}")]
    ParticipantNotFound(ParticipantId),

    /// The decision no longer accepts votes.
    #[error("Decision {decision_id} is no longer accepting votes (status: {status})")]
    InvalidState {
        decision_id: DecisionId,
        status: DecisionStatus,
    },

    /// Input failed validation.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },
}

impl DecisionError {
    pub fn decision_not_found(id: DecisionId) -> Self {
        DecisionError::DecisionNotFound(id)
    }

    pub fn participant_not_found(id: ParticipantId) -> Self {
        DecisionError::ParticipantNotFound(id)
    }

    pub fn invalid_state(decision_id: DecisionId, status: DecisionStatus) -> Self {
        DecisionError::InvalidState { decision_id, status }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DecisionError::DecisionNotFound(_) => ErrorCode::DecisionNotFound,
            DecisionError::ParticipantNotFound(_) => ErrorCode::ParticipantNotFound,
            DecisionError::InvalidState { .. } => ErrorCode::VotingClosed,
            DecisionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
        }
    }

    /// True for both kinds of missing-id failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DecisionError::DecisionNotFound(_) | DecisionError::ParticipantNotFound(_)
        )
    }
}

impl From<ValidationError> for DecisionError {
    fn from(err: ValidationError) -> Self {
        DecisionError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
