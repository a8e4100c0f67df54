//! Report aggregate
//!
//! A client-submitted report definition. The schedule is the only part this
//! crate computes over; sources, granularity and output layout are carried
//! as opaque pass-through state for the excluded generation/delivery layers.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{calculate_delay_seconds, Schedule};

/// Pin kind of a device data stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinType {
    Virtual,
    Digital,
    Analog,
}

/// One device stream feeding a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStream {
    pub pin: u8,
    pub pin_type: PinType,
    #[serde(default)]
    pub label: Option<String>,
}

/// A group of streams pulled from a set of devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSource {
    pub streams: Vec<DataStream>,
    #[serde(default)]
    pub device_ids: Vec<u32>,
}

/// Aggregation granularity of the report's data points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Minute,
    Hourly,
    Daily,
}

/// Artifact layout of the rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutput {
    CsvPerDevicePerPin,
    CsvPerDevice,
    MergedCsv,
}

/// Aggregate root: one periodic report. Owns its schedule exclusively; the
/// schedule is immutable after creation and every recomputation re-derives
/// from its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: u32,
    pub name: String,
    pub sources: Vec<ReportSource>,
    pub schedule: Schedule,
    pub recipient: String,
    pub granularity: Granularity,
    pub output: ReportOutput,
}

impl Report {
    /// Registry-side checks run at report-save time.
    ///
    /// A report that fails here must be rejected outright: a stale window
    /// or unresolvable zone produces an immediate failure at save time, not
    /// a silently wrong first execution.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("report name cannot be empty".to_string());
        }

        if self.sources.iter().all(|s| s.streams.is_empty()) {
            errors.push("report has no data streams".to_string());
        }

        if !self.recipient.contains('@') {
            errors.push(format!(
                "recipient '{}' is not an email address",
                self.recipient
            ));
        }

        if let Err(e) = self.schedule.check_fields() {
            errors.push(e.to_string());
        } else if let Err(e) = calculate_delay_seconds(&self.schedule, now) {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(
                "report '{}' rejected:\n  - {}",
                self.name,
                errors.join("\n  - ")
            )
        }
    }
}
