//! Application layer - Commands, the decision engine, and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The engine owns all mutable state; the sweeper drives deadline checks.

mod commands;
mod engine;
mod timeout_sweeper;

pub use commands::{ApprovalHooks, CastVoteCommand, ProposeDecisionCommand};
pub use engine::DecisionEngine;
pub use timeout_sweeper::TimeoutSweeper;
