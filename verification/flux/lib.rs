//! Flux Refinement Types for ReportSched
//!
//! This module contains Flux refinement type annotations for critical functions.
//! To verify, install Flux and run: flux-rs check verification/flux/lib.rs
//!
//! Flux installation: https://github.com/flux-rs/flux

// ============================================================================
// DELAY PROJECTION: Result is a non-negative whole-second count
// ============================================================================

/// Whole seconds covering a millisecond interval
///
/// Flux signature ensures the delay handed to the dispatcher is never
/// negative
#[flux::sig(fn(delta_ms: i64) -> i64{v: v >= 0})]
pub fn ceil_seconds(delta_ms: i64) -> i64 {
    if delta_ms <= 0 {
        0
    } else if delta_ms > i64::MAX - 999 {
        i64::MAX / 1000
    } else {
        (delta_ms + 999) / 1000
    }
}

// ============================================================================
// MONTH ARITHMETIC: Month numbers stay in 1..=12
// ============================================================================

/// A calendar month number
#[flux::alias(type Month = u32{v: v >= 1 && v <= 12})]
pub type Month = u32;

/// The month after (year, month)
///
/// Flux signature ensures the successor month number is still in range
#[flux::sig(fn(year: i32, month: u32{v: v >= 1 && v <= 12}) -> (i32, u32{v: v >= 1 && v <= 12}))]
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Number of days in a month
///
/// Flux signature ensures every month resolves to a real month length
#[flux::sig(fn(year: i32, month: u32{v: v >= 1 && v <= 12}) -> u32{v: v >= 28 && v <= 31})]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
    }
}

// ============================================================================
// WEEKDAY SEARCH: Results stay in the Monday-first 1..=7 convention
// ============================================================================

/// Monday-first weekday number of an epoch day (day 0 is a Thursday)
///
/// Flux signature ensures the weekday is always a valid selector
#[flux::sig(fn(epoch_day: i64) -> u8{v: v >= 1 && v <= 7})]
pub fn weekday_of_epoch_day(epoch_day: i64) -> u8 {
    let shifted = (epoch_day + 3).rem_euclid(7);
    (shifted as u8) + 1
}

/// Bounded weekday search: at most seven steps from the starting day
///
/// Flux signature bounds how far the candidate search can run ahead
#[flux::sig(fn(from: i64, target: u8{v: v >= 1 && v <= 7}) -> i64{v: v >= from && v <= from + 7})]
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
