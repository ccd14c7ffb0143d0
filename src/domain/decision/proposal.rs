//! Proposal payload describing what is being decided.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::ParticipantId;

/// Immutable description of a proposed decision.
///
/// The proposer is carried for attribution only and is not checked
/// against the participant registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    title: String,
    description: String,
    #[serde(default)]
    required_capabilities: BTreeSet<String>,
    proposer: ParticipantId,
}

impl Proposal {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        proposer: ParticipantId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            required_capabilities: BTreeSet::new(),
            proposer,
        }
    }

    /// Restrict eligibility to participants holding any of `capabilities`.
    pub fn with_required_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required_capabilities(&self) -> &BTreeSet<String> {
        &self.required_capabilities
    }

    pub fn proposer(&self) -> &ParticipantId {
        &self.proposer
    }
}
