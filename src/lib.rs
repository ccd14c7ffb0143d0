//! Collective Decision - Weighted-voting consensus for cooperating agents
//!
//! Participants register with capabilities and a voting weight. Proposals
//! open decisions that resolve to approved, rejected, or timeout, and an
//! approved decision runs its attached action and callbacks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
