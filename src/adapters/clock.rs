//! Clock adapters.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// ```ignore
/// let clock = Arc::new(ManualClock::starting_at(0));
/// clock.advance_millis(30_001);
/// engine.resolve_pending().await;
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    unix_millis: AtomicI64,
}

impl ManualClock {
    pub fn starting_at(unix_millis: i64) -> Self {
        Self {
            unix_millis: AtomicI64::new(unix_millis),
        }
    }

    pub fn advance_millis(&self, millis: i64) {
        self.unix_millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set_millis(&self, unix_millis: i64) {
        self.unix_millis.store(unix_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.unix_millis.load(Ordering::SeqCst))
    }
}
