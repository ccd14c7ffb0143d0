//! Clock port - source of the current time.

use crate::domain::foundation::Timestamp;

/// Supplies "now" to the engine so deadlines can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
