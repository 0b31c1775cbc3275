//! Clock port.
//!
//! TTL checks go through an injected clock so cache-staleness tests can
//! pin time instead of sleeping.

use chrono::{DateTime, Utc};

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Shared clocks are common in tests (the store holds one, the test the other).
impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        self.as_ref().now()
    }
}

/// Test double returning a fixed instant.
pub mod testing {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// A clock pinned to a settable instant.
    pub struct FixedClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        #[must_use]
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Move the clock to a new instant.
        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap() = now;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
