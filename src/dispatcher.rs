//! Report dispatch loop
//!
//! The dispatcher side of the calculator contract: one loop per report,
//! each asking the calculator how long until the next fire, sleeping that
//! long, firing, then re-asking with a freshly observed now. The calculator
//! itself never loops and never sleeps.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::report::Report;
use crate::schedule::calculate_delay_seconds;

/// Format a delay for logging
pub fn format_delay(seconds: i64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Dispatch a single report until its window elapses or the token fires.
///
/// `fire` is invoked once per due instant; report generation and delivery
/// live behind it, outside this crate.
pub async fn run_report_loop<C, F>(
    report: Report,
    clock: Arc<C>,
    cancel: CancellationToken,
    mut fire: F,
) where
    C: Clock,
    F: FnMut(&Report),
{
    loop {
        let delay = match calculate_delay_seconds(&report.schedule, clock.now()) {
            Ok(delay) => delay,
            Err(e) => {
                // A custom window can elapse between fires; the report is done
                warn!("Report '{}' deactivated: {}", report.name, e);
                return;
            }
        };

        info!("Report '{}' fires in {}", report.name, format_delay(delay));

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Report '{}' dispatch cancelled", report.name);
                return;
            }
            _ = sleep(Duration::from_secs(delay as u64)) => {}
        }

        fire(&report);
    }
}

/// Run dispatch loops for every report until cancelled
pub async fn run_dispatcher<C>(reports: Vec<Report>, clock: Arc<C>, cancel: CancellationToken)
where
    C: Clock + 'static,
{
    info!("Dispatcher started ({} reports)", reports.len());

    let mut handles = Vec::new();
    for report in reports {
        let clock = Arc::clone(&clock);
        let cancel = cancel.clone();
        handles.push(tokio::spawn(async move {
            run_report_loop(report, clock, cancel, |r| {
                info!("Firing report '{}' for {}", r.name, r.recipient);
            })
            .await;
        }));
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!("Report dispatch task failed: {}", e);
        }
    }

    info!("Dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::report::{DataStream, Granularity, PinType, ReportOutput, ReportSource};
    use crate::schedule::{DurationType, Schedule};
    use chrono::Utc;

    fn report_with(schedule: Schedule) -> Report {
        Report {
            id: 7,
            name: "Test Report".to_string(),
            sources: vec![ReportSource {
                streams: vec![DataStream {
                    pin: 1,
                    pin_type: PinType::Virtual,
                    label: None,
                }],
                device_ids: vec![0],
            }],
            schedule,
            recipient: "ops@example.com".to_string(),
            granularity: Granularity::Hourly,
            output: ReportOutput::MergedCsv,
        }
    }

    #[test]
    fn test_format_delay() {
        assert_eq!(format_delay(86_400), "24h 0m");
        assert_eq!(format_delay(3_660), "1h 1m");
        assert_eq!(format_delay(90), "1m 30s");
        assert_eq!(format_delay(59), "59s");
        assert_eq!(format_delay(0), "0s");
    }

    #[test]
    fn test_loop_exits_on_elapsed_window() {
        // Window already elapsed: the loop must return without firing
        let now_ms = Utc::now().timestamp_millis();
        let report = report_with(Schedule::daily(
            now_ms,
            DurationType::Custom,
            now_ms - 2_000,
            now_ms - 1_000,
            "UTC",
        ));

        let mut fired = 0;
        tokio_test::block_on(run_report_loop(
            report,
            Arc::new(SystemClock),
            CancellationToken::new(),
            |_| fired += 1,
        ));
        assert_eq!(fired, 0);
    }

    #[tokio::test]
    async fn test_loop_cancels_while_sleeping() {
        let now_ms = Utc::now().timestamp_millis();
        let report = report_with(Schedule::daily(now_ms, DurationType::Infinite, 0, 0, "UTC"));

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let mut fired = 0;
        run_report_loop(report, Arc::new(SystemClock), cancel, |_| fired += 1).await;
        // The first delay is ~24h; cancellation must win without a fire
        assert_eq!(fired, 0);
    }

    #[tokio::test]
    async fn test_loop_fires_when_due() {
        // Anchor two seconds ahead: one fire, then cancel during the next sleep
        let now_ms = Utc::now().timestamp_millis();
        let report = report_with(Schedule::daily(
            now_ms + 2_000,
            DurationType::Infinite,
            0,
            0,
            "UTC",
        ));

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(3_500)).await;
            canceller.cancel();
        });

        let mut fired = 0;
        run_report_loop(report, Arc::new(SystemClock), cancel, |_| fired += 1).await;
        assert_eq!(fired, 1);
    }

    #[tokio::test]
    async fn test_dispatcher_drains_on_cancel() {
        let now_ms = Utc::now().timestamp_millis();
        let reports = vec![
            report_with(Schedule::daily(now_ms, DurationType::Infinite, 0, 0, "UTC")),
            report_with(Schedule::weekly(now_ms, DurationType::Infinite, 0, 0, "UTC", 1)),
        ];

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        run_dispatcher(reports, Arc::new(SystemClock), cancel).await;
    }
}
