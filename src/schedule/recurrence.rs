//! Recurrence calculation
//!
//! Turns a schedule and the current instant into the next qualifying fire
//! instant. All wall-clock work (time-of-day extraction, day boundaries,
//! weekday and day-of-month comparisons) happens in the report's own zone,
//! never in the server's local zone.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;

use crate::schedule::{DayOfMonth, Schedule, ScheduleError};

/// Resolve an IANA zone name
fn resolve_tz(name: &str) -> Result<Tz, ScheduleError> {
    name.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Compute the next instant, strictly after `now`, at which the schedule's
/// recurrence rule is satisfied. The activation window is ignored here;
/// reconciliation against it happens in the delay projector.
///
/// An anchor whose time-of-day lands exactly on `now` resolves to the next
/// cycle: the search is always for a strictly future occurrence.
pub fn next_occurrence(
    schedule: &Schedule,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let base = schedule.base();
    let tz = resolve_tz(&base.tz)?;

    // Anchor millis outside chrono's representable range fall back to the
    // epoch; only the time-of-day is read either way.
    let anchor_utc = DateTime::<Utc>::from_timestamp_millis(base.anchor_ms).unwrap_or_default();
    let local_anchor = anchor_utc.with_timezone(&tz);

    // The recurring fire time-of-day, sub-second truncated
    let fire_time = NaiveTime::from_hms_opt(
        local_anchor.hour(),
        local_anchor.minute(),
        local_anchor.second(),
    )
    .unwrap_or(NaiveTime::MIN);

    let today = now.with_timezone(&tz).date_naive();

    let candidate = match schedule {
        Schedule::Daily { .. } => {
            let instant = local_instant(&tz, today, fire_time);
            if instant <= now {
                let tomorrow = today.succ_opt().unwrap_or(today);
                local_instant(&tz, tomorrow, fire_time)
            } else {
                instant
            }
        }

        Schedule::Weekly { day_of_week, .. } => {
            // Day-by-day advance, bounded: only today's candidate can be
            // at-or-before now, so eight dates always contain the answer.
            let target = u32::from(*day_of_week);
            let mut date = today;
            for _ in 0..7 {
                if date.weekday().number_from_monday() == target
                    && local_instant(&tz, date, fire_time) > now
                {
                    break;
                }
                date = date.succ_opt().unwrap_or(date);
            }
            local_instant(&tz, date, fire_time)
        }

        Schedule::Monthly { day_of_month, .. } => {
            let date = month_fire_date(today.year(), today.month(), *day_of_month);
            let instant = local_instant(&tz, date, fire_time);
            if instant <= now {
                let (year, month) = next_month(today.year(), today.month());
                let date = month_fire_date(year, month, *day_of_month);
                local_instant(&tz, date, fire_time)
            } else {
                instant
            }
        }
    };

    Ok(candidate)
}

/// Combine a local date and wall-clock time in `tz` into a UTC instant.
///
/// Overlapping local times (DST fall-back) take the earlier offset;
/// nonexistent local times (DST spring-forward gap) shift forward hour by
/// hour until a valid wall-clock time exists.
fn local_instant(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let mut naive = NaiveDateTime::new(date, time);
    for _ in 0..4 {
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => naive = naive + Duration::hours(1),
        }
    }
    // No zone in the tz database has a gap this long
    Utc.from_utc_datetime(&naive)
}

/// The calendar day the monthly rule resolves to in the given month
fn month_fire_date(year: i32, month: u32, rule: DayOfMonth) -> NaiveDate {
    let day = match rule {
        DayOfMonth::First => 1,
        DayOfMonth::Last => last_day_of_month(year, month),
    };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Final calendar day of the month: 28, 29, 30 or 31
fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}



/// Kani formal verification proofs
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    #[kani::proof]
    fn next_month_stays_in_range() {
        let month: u32 = kani::any();
        kani::assume(month >= 1 && month <= 12);
        let year: i32 = kani::any();
        kani::assume(year > -200_000 && year < 200_000);

        let (ny, nm) = next_month(year, month);

        kani::assert(nm >= 1 && nm <= 12, "month must stay in 1..=12");
        kani::assert(
            ny == year || (ny == year + 1 && nm == 1),
            "year advances only across December",
        );
    }
}
