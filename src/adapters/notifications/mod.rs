//! Notification sink adapters.
//!
//! - `InMemoryNotificationSink` - Records deliveries for tests
//! - `TracingNotificationSink` - Writes deliveries as log events
//! - `ChannelNotificationSink` - Publishes deliveries to a tokio queue

mod channel;
mod in_memory;
mod tracing_sink;

pub use channel::{ChannelNotificationSink, Envelope};
pub use in_memory::{Delivery, InMemoryNotificationSink};
pub use tracing_sink::TracingNotificationSink;
