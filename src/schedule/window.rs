//! Activation window validation
//!
//! Runs before any recurrence math so a stale configuration is rejected
//! deterministically regardless of periodicity.

use chrono::{DateTime, Utc};

use crate::schedule::{DurationType, Schedule, ScheduleError};

/// Check a schedule's activation window against the current instant.
///
/// Infinite schedules always pass. Custom schedules pass iff the window end
/// is strictly after `now`; otherwise the whole schedule is invalid and the
/// caller must reject it, never clamp it.
pub fn validate_window(schedule: &Schedule, now: DateTime<Utc>) -> Result<(), ScheduleError> {
    let base = schedule.base();
    match base.duration {
        DurationType::Infinite => Ok(()),
        DurationType::Custom => {
            let now_ms = now.timestamp_millis();
            if base.end_ms > now_ms {
                Ok(())
            } else {
                Err(ScheduleError::WindowElapsed {
                    end_ms: base.end_ms,
                    now_ms,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::schedule::DayOfMonth;

    const NOW_MS: i64 = 1_555_200_000_000; // 2019-04-14 00:00:00 UTC

    fn now() -> DateTime<Utc> {
        FixedClock::at_millis(NOW_MS).now()
    }

    #[test]
    fn test_infinite_always_valid() {
        let s = Schedule::daily(0, DurationType::Infinite, 0, 0, "UTC");
        assert!(validate_window(&s, now()).is_ok());
    }

    #[test]
    fn test_infinite_ignores_window_fields() {
        // Stale-looking bounds are dead fields outside Custom duration
        let s = Schedule::daily(0, DurationType::Infinite, NOW_MS - 10, NOW_MS - 5, "UTC");
        assert!(validate_window(&s, now()).is_ok());
    }

    #[test]
    fn test_custom_end_in_future_valid() {
        let s = Schedule::daily(0, DurationType::Custom, 0, NOW_MS + 1, "UTC");
        assert!(validate_window(&s, now()).is_ok());
    }

    #[test]
    fn test_custom_end_in_past_rejected() {
        let s = Schedule::daily(0, DurationType::Custom, 0, NOW_MS - 86_400_000, "UTC");
        let err = validate_window(&s, now()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::WindowElapsed {
                end_ms: NOW_MS - 86_400_000,
                now_ms: NOW_MS,
            }
        );
    }

    #[test]
    fn test_custom_end_equal_to_now_rejected() {
        // The window must end strictly after now
        let s = Schedule::daily(0, DurationType::Custom, 0, NOW_MS, "UTC");
        assert!(validate_window(&s, now()).is_err());
    }

    #[test]
    fn test_rejection_is_variant_independent() {
        let stale_end = NOW_MS - 1;
        let schedules = [
            Schedule::daily(0, DurationType::Custom, 0, stale_end, "UTC"),
            Schedule::weekly(0, DurationType::Custom, 0, stale_end, "UTC", 1),
            Schedule::monthly(0, DurationType::Custom, 0, stale_end, "UTC", DayOfMonth::First),
        ];
        for s in &schedules {
            assert!(validate_window(s, now()).is_err());
        }
    }

    #[test]
    fn test_runs_before_timezone_resolution() {
        // A stale window fails even when the zone would not resolve: the
        // window check is first in the pipeline
        let s = Schedule::daily(0, DurationType::Custom, 0, NOW_MS - 1, "Not/AZone");
        assert!(matches!(
            validate_window(&s, now()),
            Err(ScheduleError::WindowElapsed { .. })
        ));
    }
}
