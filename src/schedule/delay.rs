//! Delay projection and window reconciliation
//!
//! The one operation the external job dispatcher consumes: how many whole
//! seconds remain until this schedule's next fire.

use chrono::{DateTime, Utc};

use crate::schedule::{next_occurrence, validate_window, DurationType, Schedule, ScheduleError};

/// Seconds until the schedule's next fire instant.
///
/// Pipeline: window validation (fails fast on an elapsed Custom window),
/// periodic next occurrence, then reconciliation against the window start:
/// a window that has not opened yet defers the first fire to its start even
/// when that is off the periodic cadence. The result is a whole-second
/// ceiling of the remaining interval and is never negative.
///
/// Pure and idempotent over identical `(schedule, now)` inputs; the caller
/// re-invokes it after each fire with a freshly observed now.
pub fn calculate_delay_seconds(
    schedule: &Schedule,
    now: DateTime<Utc>,
) -> Result<i64, ScheduleError> {
    validate_window(schedule, now)?;

    let periodic = next_occurrence(schedule, now)?;

    let base = schedule.base();
    let now_ms = now.timestamp_millis();
    let mut effective_ms = periodic.timestamp_millis();
    if base.duration == DurationType::Custom && base.start_ms > now_ms {
        effective_ms = effective_ms.max(base.start_ms);
    }

    Ok(ceil_seconds(effective_ms - now_ms))
}

/// Whole seconds covering `delta_ms`, floored at zero
fn ceil_seconds(delta_ms: i64) -> i64 {
    if delta_ms <= 0 {
        0
    } else {
        delta_ms.saturating_add(999) / 1000
    }
}



/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn ceil_seconds_never_negative() {
        let delta: i64 = kani::any();
        kani::assert(ceil_seconds(delta) >= 0, "delay must be non-negative");
    }

    #[kani::proof]
    fn ceil_seconds_covers_positive_interval() {
        let delta: i64 = kani::any();
        kani::assume(delta > 0 && delta < i64::MAX - 1000);
        let secs = ceil_seconds(delta);
        kani::assert(secs * 1000 >= delta, "sleep must cover the interval");
        kani::assert((secs - 1) * 1000 < delta, "sleep must not overshoot a full second");
    }
}
