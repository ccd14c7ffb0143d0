//! Queue-backed notification sink.
//!
//! Pushes each delivery onto a tokio channel so a separate task (a socket
//! writer, an agent runtime) can forward it at its own pace.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::decision::DecisionNotification;
use crate::domain::foundation::{DomainError, ErrorCode, ParticipantId};
use crate::ports::NotificationSink;

/// A queued delivery.
pub type Envelope = (ParticipantId, DecisionNotification);

/// Sink that publishes notifications to an unbounded mpsc queue.
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<Envelope>,
}

impl ChannelNotificationSink {
    /// Creates the sink and the receiving end of its queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationSink for ChannelNotificationSink {
    async fn notify(
        &self,
        participant_id: &ParticipantId,
        notification: &DecisionNotification,
    ) -> Result<(), DomainError> {
        self.sender
            .send((participant_id.clone(), notification.clone()))
            .map_err(|_| {
                DomainError::new(ErrorCode::NotificationFailed, "Notification queue is closed")
                    .with_detail("participant_id", participant_id.as_str())
            })
    }
}
