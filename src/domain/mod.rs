//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `decision` - Participants, proposals, votes, and the decision aggregate

pub mod decision;
pub mod foundation;
