//! Decision module - weighted voting over proposals.
//!
//! # Lifecycle
//!
//! ```text
//!            ┌──► Approved ──► (action + callbacks)
//! Voting ────┼──► Rejected
//!            └──► Timeout
//! ```
//!
//! A decision resolves when the approve or reject weight, divided by the
//! weight of every registered participant, meets the voting threshold.
//! Approval is checked first. If neither side gets there before the
//! deadline, the decision times out.

mod aggregate;
mod errors;
mod events;
mod metrics;
mod participant;
mod proposal;
mod status;
mod vote;

#[cfg(test)]
mod proptests;

pub use aggregate::{Decision, ExecutionReport};
pub use errors::DecisionError;
pub use events::{DecisionNotification, ProposalNotice};
pub use metrics::{DecisionProgress, DecisionStatusView, EngineMetrics, VoteReceipt};
pub use participant::{Participant, ParticipantStatus, DEFAULT_WEIGHT};
pub use proposal::Proposal;
pub use status::DecisionStatus;
pub use vote::{VoteChoice, VoteRecord, VoteTally};
