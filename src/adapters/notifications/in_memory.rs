//! In-memory notification sink for testing.
//!
//! Records every delivery so tests can assert on who was told what.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::domain::decision::DecisionNotification;
use crate::domain::foundation::{DecisionId, DomainError, ErrorCode, ParticipantId};
use crate::ports::NotificationSink;

/// A notification as received by one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub participant_id: ParticipantId,
    pub notification: DecisionNotification,
}

/// Recording notification sink.
///
/// Features:
/// - Delivery capture for assertions
/// - Optional failure injection for specific recipients
///
/// # Example
///
/// ```ignore
/// let sink = Arc::new(InMemoryNotificationSink::new());
/// let engine = DecisionEngine::new(config, sink.clone())?;
/// // ...
/// assert_eq!(sink.recipients_of("decision_proposal", id).len(), 2);
/// ```
#[derive(Default)]
pub struct InMemoryNotificationSink {
    deliveries: Mutex<Vec<Delivery>>,
    failing_for: Mutex<Vec<ParticipantId>>,
}

impl InMemoryNotificationSink {
    /// Creates a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery to `participant_id` fail. Failed deliveries are
    /// not recorded.
    pub fn fail_for(&self, participant_id: ParticipantId) {
        lock(&self.failing_for).push(participant_id);
    }

    // === Test Helpers ===

    /// Returns all successful deliveries in order.
    pub fn deliveries(&self) -> Vec<Delivery> {
        lock(&self.deliveries).clone()
    }

    /// Returns deliveries of one notification type.
    pub fn deliveries_of_type(&self, event_type: &str) -> Vec<Delivery> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.notification.event_type() == event_type)
            .collect()
    }

    /// Participants that received `event_type` for `decision_id`, sorted.
    pub fn recipients_of(&self, event_type: &str, decision_id: DecisionId) -> Vec<ParticipantId> {
        let mut recipients: Vec<ParticipantId> = self
            .deliveries_of_type(event_type)
            .into_iter()
            .filter(|d| d.notification.decision_id() == decision_id)
            .map(|d| d.participant_id)
            .collect();
        recipients.sort();
        recipients
    }

    /// Returns count of successful deliveries.
    pub fn delivery_count(&self) -> usize {
        lock(&self.deliveries).len()
    }

    /// Clears recorded deliveries (for test isolation).
    pub fn clear(&self) {
        lock(&self.deliveries).clear();
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn notify(
        &self,
        participant_id: &ParticipantId,
        notification: &DecisionNotification,
    ) -> Result<(), DomainError> {
        if lock(&self.failing_for).contains(participant_id) {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("Simulated delivery failure for {}", participant_id),
            ));
        }

        lock(&self.deliveries).push(Delivery {
            participant_id: participant_id.clone(),
            notification: notification.clone(),
        });
        Ok(())
    }
}

// Poisoned locks still hold a consistent Vec.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
