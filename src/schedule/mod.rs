//! Report schedule model
//!
//! A schedule is the declared periodicity of a report: Daily, Weekly or
//! Monthly, each anchored to a creation-time instant whose zone-projected
//! time-of-day defines when the report fires, plus an optional bounded
//! activation window. Schedules are immutable after construction; every
//! delay computation re-derives from these fields.

mod delay;
mod recurrence;
mod window;

pub use delay::calculate_delay_seconds;
pub use recurrence::next_occurrence;
pub use window::validate_window;

use anyhow::bail;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the delay calculator.
///
/// There is no partial-success mode: a schedule either yields a fully valid
/// delay or fails with one of these, and the caller must reject it outright.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Custom activation window whose end is not strictly after the
    /// evaluation instant
    #[error("activation window elapsed: end {end_ms} is not after now {now_ms}")]
    WindowElapsed { end_ms: i64, now_ms: i64 },

    /// Unresolvable IANA zone name
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// How long a schedule stays active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    /// Fires forever
    Infinite,
    /// Fires only inside the `[start_ms, end_ms]` activation window
    Custom,
}

/// Which day of the calendar month a monthly schedule fires on.
///
/// Only the two symbolic anchors are supported; anything else in a report
/// definition fails to deserialize rather than defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfMonth {
    /// The 1st of the month
    First,
    /// The final calendar day, 28/29/30/31 depending on the month
    Last,
}

/// Anchor, activation window and zone shared by every variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBase {
    /// Epoch millis recorded at creation. Only its zone-projected
    /// time-of-day is meaningful; the date component is not.
    pub anchor_ms: i64,
    pub duration: DurationType,
    /// Activation window start, epoch millis; read only for Custom
    #[serde(default)]
    pub start_ms: i64,
    /// Activation window end, epoch millis; read only for Custom
    #[serde(default)]
    pub end_ms: i64,
    /// IANA zone name, e.g. "Europe/Kiev"; resolved at first use
    pub tz: String,
}

/// Declared periodicity of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    /// Fires every day at the anchor's time-of-day
    Daily {
        #[serde(flatten)]
        base: ScheduleBase,
    },
    /// Fires once a week on `day_of_week` at the anchor's time-of-day
    Weekly {
        #[serde(flatten)]
        base: ScheduleBase,
        /// 1..=7, Monday-first
        day_of_week: u8,
    },
    /// Fires once a month on the resolved `day_of_month`
    Monthly {
        #[serde(flatten)]
        base: ScheduleBase,
        day_of_month: DayOfMonth,
    },
}

impl Schedule {
    pub fn daily(
        anchor_ms: i64,
        duration: DurationType,
        start_ms: i64,
        end_ms: i64,
        tz: impl Into<String>,
    ) -> Self {
        Schedule::Daily {
            base: ScheduleBase {
                anchor_ms,
                duration,
                start_ms,
                end_ms,
                tz: tz.into(),
            },
        }
    }

    pub fn weekly(
        anchor_ms: i64,
        duration: DurationType,
        start_ms: i64,
        end_ms: i64,
        tz: impl Into<String>,
        day_of_week: u8,
    ) -> Self {
        Schedule::Weekly {
            base: ScheduleBase {
                anchor_ms,
                duration,
                start_ms,
                end_ms,
                tz: tz.into(),
            },
            day_of_week,
        }
    }

    pub fn monthly(
        anchor_ms: i64,
        duration: DurationType,
        start_ms: i64,
        end_ms: i64,
        tz: impl Into<String>,
        day_of_month: DayOfMonth,
    ) -> Self {
        Schedule::Monthly {
            base: ScheduleBase {
                anchor_ms,
                duration,
                start_ms,
                end_ms,
                tz: tz.into(),
            },
            day_of_month,
        }
    }

    /// Fields shared by every variant
    pub fn base(&self) -> &ScheduleBase {
        match self {
            Schedule::Daily { base } => base,
            Schedule::Weekly { base, .. } => base,
            Schedule::Monthly { base, .. } => base,
        }
    }

    /// Field-range checks that belong at construction time.
    ///
    /// The evaluation path enforces only the end-in-past rule; a window
    /// whose start is after its end is rejected here so it never reaches
    /// the calculator.
    pub fn check_fields(&self) -> anyhow::Result<()> {
        let base = self.base();

        if base.tz.parse::<chrono_tz::Tz>().is_err() {
            bail!("unknown timezone '{}'", base.tz);
        }

        if base.duration == DurationType::Custom && base.start_ms > base.end_ms {
            bail!(
                "activation window start {} is after end {}",
                base.start_ms,
                base.end_ms
            );
        }

        if let Schedule::Weekly { day_of_week, .. } = self {
            if !(1..=7).contains(day_of_week) {
                bail!("day_of_week {} out of range 1..=7 (Monday-first)", day_of_week);
            }
        }

        Ok(())
    }
}
