//! Aeneas-compatible Rust code for Lean verification
//!
//! This module contains simplified Rust code that can be translated to Lean 4
//! using Aeneas for formal verification.
//!
//! To verify:
//!   1. Install Aeneas: https://github.com/AeneasVerif/aeneas
//!   2. Run: aeneas -backend lean4 src/lib.rs
//!   3. Write proofs in the generated Lean files
//!
//! Note: Aeneas works best with simple, ownership-clear code.
//! Avoid: unsafe, RefCell, async, complex generics.
//!
//! The functions below restate the pure arithmetic of the delay calculator
//! over plain integers (epoch days and milliseconds) so the Lean proofs do
//! not have to model the chrono types.

/// Proleptic Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a month (1..=12)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// The month after (year, month), wrapping across December
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Monday-first weekday number (1..=7) of an epoch day
/// (day 0 = 1970-01-01, a Thursday)
pub fn weekday_of_epoch_day(epoch_day: i64) -> u8 {
    let shifted = (epoch_day + 3).rem_euclid(7);
    (shifted as u8) + 1
}

/// Smallest epoch day >= `from` whose weekday equals `target` (1..=7).
/// The search is bounded: it inspects at most 7 candidates.
pub fn next_epoch_day_with_weekday(from: i64, target: u8) -> i64 {
    let mut day = from;
    let mut steps = 0;
    while steps < 7 {
        if weekday_of_epoch_day(day) == target {
            return day;
        }
        day += 1;
        steps += 1;
    }
    day
}

/// Whole seconds covering a millisecond interval, floored at zero
pub fn ceil_seconds(delta_ms: i64) -> i64 {
    if delta_ms <= 0 {
        0
    } else if delta_ms > i64::MAX - 999 {
        i64::MAX / 1000
    } else {
        (delta_ms + 999) / 1000
    }
}

/// Effective fire instant: the later of the periodic occurrence and the
/// activation window start, applied only when the window has not opened
pub fn effective_fire_ms(periodic_ms: i64, start_ms: i64, now_ms: i64, custom: bool) -> i64 {
    if custom && start_ms > now_ms {
        if start_ms > periodic_ms {
            start_ms
        } else {
            periodic_ms
        }
    } else {
        periodic_ms
    }
}
