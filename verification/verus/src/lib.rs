//! Verus Formal Verification for ReportSched
//!
//! This module contains Verus specifications and proofs for critical functions.
//! To verify, install Verus and run: verus verification/verus/src/lib.rs
//!
//! Verus installation: https://github.com/verus-lang/verus

use vstd::prelude::*;

verus! {

// ============================================================================
// DELAY PROJECTION: ceil-seconds is non-negative and covers the interval
// ============================================================================

/// Specification: whole seconds covering a millisecond interval
#[spec]
pub fn ceil_seconds_spec(delta_ms: int) -> int {
    if delta_ms <= 0 {
        0
    } else {
        (delta_ms + 999) / 1000
    }
}

/// Proof: the projected delay is never negative
#[proof]
pub fn lemma_delay_nonnegative(delta_ms: int)
    ensures
        ceil_seconds_spec(delta_ms) >= 0,
{
    // Non-positive inputs map to 0; positive inputs divide a positive
    // numerator by 1000
}

/// Proof: sleeping the projected delay covers the interval, so the
/// dispatcher never fires early
#[proof]
pub fn lemma_delay_covers_interval(delta_ms: int)
    requires
        delta_ms > 0,
    ensures
        ceil_seconds_spec(delta_ms) * 1000 >= delta_ms,
        (ceil_seconds_spec(delta_ms) - 1) * 1000 < delta_ms,
{
    // Euclidean division: (d + 999) / 1000 is the least q with
    // q * 1000 >= d
}

/// Executable projection with verified bounds
#[exec]
pub fn ceil_seconds_verified(delta_ms: i64) -> (result: i64)
    requires
        delta_ms < i64::MAX - 999,
    ensures
        result >= 0,
{
    if delta_ms <= 0 {
        0
    } else {
        (delta_ms + 999) / 1000
    }
}

// ============================================================================
// MONTH ARITHMETIC: successor month stays in range
// ============================================================================

/// Specification: the month after (year, month)
#[spec]
pub fn next_month_spec(month: int) -> int {
    if month == 12 {
        1
    } else {
        month + 1
    }
}

/// Proof: month numbers stay in 1..=12
#[proof]
pub fn lemma_next_month_in_range(month: int)
    requires
        1 <= month && month <= 12,
    ensures
        1 <= next_month_spec(month) && next_month_spec(month) <= 12,
{
    // Case split on month == 12
}

// ============================================================================
// WEEKDAY SEARCH: the Monday-first number is always a valid selector
// ============================================================================

/// Specification: Monday-first weekday of an epoch day (day 0 = Thursday)
#[spec]
pub fn weekday_spec(epoch_day: int) -> int {
    ((epoch_day + 3) % 7 + 7) % 7 + 1
}

/// Proof: weekday numbers stay in 1..=7
#[proof]
pub fn lemma_weekday_in_range(epoch_day: int)
    ensures
        1 <= weekday_spec(epoch_day) && weekday_spec(epoch_day) <= 7,
{
    // The double modulus lands in 0..=6 before the +1
}

/// Proof: weekdays repeat with period 7
#[proof]
pub fn lemma_weekday_periodic(epoch_day: int)
    ensures
        weekday_spec(epoch_day + 7) == weekday_spec(epoch_day),
{
    // (d + 7 + 3) % 7 == (d + 3) % 7
}

} // verus!
