//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the decision engine to the outside world:
//! - `notifications` - Notification sinks (in-memory, tracing, channel)
//! - `clock` - System and manual clocks

pub mod clock;
pub mod notifications;

pub use clock::{ManualClock, SystemClock};
pub use notifications::{
    ChannelNotificationSink, Delivery, InMemoryNotificationSink, TracingNotificationSink,
};
