//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the decision engine and the outside world. Adapters implement these ports.
//!
//! - `NotificationSink` - Delivers proposal and result notifications
//! - `DecisionAction` - Side effect run when a decision is approved
//! - `Clock` - Current time, swappable in tests

mod clock;
mod decision_action;
mod notification_sink;

pub use clock::Clock;
pub use decision_action::DecisionAction;
pub use notification_sink::NotificationSink;
