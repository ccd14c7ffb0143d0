//! NotificationSink port - Interface for delivering decision notifications.
//!
//! The engine decides *who* hears about a decision and *what* they hear;
//! the sink decides *how* the message travels (log line, queue, socket).

use async_trait::async_trait;

use crate::domain::decision::DecisionNotification;
use crate::domain::foundation::{DomainError, ParticipantId};

/// Port for delivering notifications to individual participants.
///
/// Implementations must ensure:
/// - One call delivers one notification to one participant
/// - Failures are returned, not swallowed; the engine logs them and
///   carries on with the remaining recipients
///
/// # Example
///
/// ```ignore
/// let notification = DecisionNotification::proposal(&decision);
/// sink.notify(&participant_id, &notification).await?;
/// ```
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification to a participant.
    async fn notify(
        &self,
        participant_id: &ParticipantId,
        notification: &DecisionNotification,
    ) -> Result<(), DomainError>;
}
