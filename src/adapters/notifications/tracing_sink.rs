//! Notification sink that writes each delivery as a structured log event.

use async_trait::async_trait;

use crate::domain::decision::DecisionNotification;
use crate::domain::foundation::{DomainError, ParticipantId};
use crate::ports::NotificationSink;

/// Logs notifications through `tracing` instead of delivering them.
///
/// Useful for local runs and demos where participants are simulated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify(
        &self,
        participant_id: &ParticipantId,
        notification: &DecisionNotification,
    ) -> Result<(), DomainError> {
        match notification {
            DecisionNotification::DecisionProposal { decision } => {
                tracing::info!(
                    participant_id = %participant_id,
                    decision_id = %decision.id,
                    title = %decision.title,
                    "Notification sent: decision_proposal"
                );
            }
            DecisionNotification::DecisionResult {
                decision_id,
                result,
                votes,
            } => {
                tracing::info!(
                    participant_id = %participant_id,
                    decision_id = %decision_id,
                    result = %result,
                    votes = votes.len(),
                    "Notification sent: decision_result"
                );
            }
        }
        Ok(())
    }
}
