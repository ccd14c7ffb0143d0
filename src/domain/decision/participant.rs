//! Voting participants and their capability tags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{ParticipantId, Timestamp, ValidationError};

/// Default voting weight when a caller does not supply one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Availability of a participant for new proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParticipantStatus::Active => "active",
            ParticipantStatus::Inactive => "inactive",
        };
        write!(f, "{}", s)
    }
}

/// A registered voter.
///
/// # Invariants
///
/// - `weight` is finite and strictly positive
/// - `registered_at <= last_seen`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    capabilities: BTreeSet<String>,
    weight: f64,
    status: ParticipantStatus,
    registered_at: Timestamp,
    last_seen: Timestamp,
}

impl Participant {
    /// Create an active participant.
    ///
    /// # Errors
    ///
    /// - `NotPositive` if weight is zero, negative, or not finite
    pub fn new<I, S>(
        id: ParticipantId,
        capabilities: I,
        weight: f64,
        now: Timestamp,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::validate_weight(weight)?;
        Ok(Self {
            id,
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            weight,
            status: ParticipantStatus::Active,
            registered_at: now,
            last_seen: now,
        })
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn registered_at(&self) -> &Timestamp {
        &self.registered_at
    }

    pub fn last_seen(&self) -> &Timestamp {
        &self.last_seen
    }

    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }

    /// Returns true if the participant holds at least one of `required`.
    ///
    /// An empty requirement set admits everyone.
    pub fn has_any_capability(&self, required: &BTreeSet<String>) -> bool {
        required.is_empty() || !self.capabilities.is_disjoint(required)
    }

    /// Whether this participant should be asked to vote on a proposal
    /// requiring `required`.
    pub fn is_eligible_for(&self, required: &BTreeSet<String>) -> bool {
        self.is_active() && self.has_any_capability(required)
    }

    /// Apply a re-registration: new capabilities and weight, reactivated.
    ///
    /// `registered_at` is preserved.
    pub fn reregister(
        &mut self,
        capabilities: BTreeSet<String>,
        weight: f64,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        Self::validate_weight(weight)?;
        self.capabilities = capabilities;
        self.weight = weight;
        self.status = ParticipantStatus::Active;
        self.last_seen = now;
        Ok(())
    }

    pub fn set_status(&mut self, status: ParticipantStatus, now: Timestamp) {
        self.status = status;
        self.last_seen = now;
    }

    /// Record activity from this participant.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_seen = now;
    }

    fn validate_weight(weight: f64) -> Result<(), ValidationError> {
        if weight.is_finite() && weight > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::not_positive("weight", weight))
        }
    }
}
