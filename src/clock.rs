//! Clock source abstraction
//!
//! Every delay computation is a pure function of (schedule, now). The core
//! takes `now` as an explicit argument; this trait supplies it, so the
//! dispatcher reads the wall clock while tests inject a fixed instant.

use chrono::{DateTime, Utc};

/// Supplies the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock source backed by the OS clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-instant source for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to an epoch-millisecond instant
    pub fn at_millis(ms: i64) -> Self {
        FixedClock(DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
