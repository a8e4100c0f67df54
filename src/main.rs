mod cli;
mod clock;
mod config;
mod dispatcher;
mod report;
mod schedule;

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use clock::{Clock, SystemClock};
use config::Config;
use dispatcher::{format_delay, run_dispatcher};
use report::Report;
use schedule::calculate_delay_seconds;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args();

    if args.help {
        cli::print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reportsched=info".parse().unwrap()),
        )
        .init();

    info!("ReportSched dispatcher v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = Config::from_env()?;
    if let Some(path) = args.reports {
        config.reports_path = path;
    }
    info!("Configuration loaded");
    info!("  Report definitions: {}", config.reports_path);
    info!("  Max reports: {}", config.max_reports);

    let clock = Arc::new(SystemClock);

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration and report definitions...");
        match config.validate().and_then(|()| {
            let reports = load_reports(&config)?;
            let now = clock.now();
            for report in &reports {
                report.validate(now)?;
            }
            Ok(reports)
        }) {
            Ok(reports) => {
                info!("All {} report definitions are valid", reports.len());
                return Ok(());
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    config.validate()?;
    let reports = accept_reports(load_reports(&config)?, clock.now())?;

    // Print next-fire delays and exit (--once mode)
    if args.once {
        let now = clock.now();
        for report in &reports {
            match calculate_delay_seconds(&report.schedule, now) {
                Ok(delay) => info!(
                    "Report '{}' fires in {} ({}s)",
                    report.name,
                    format_delay(delay),
                    delay
                ),
                Err(e) => warn!("Report '{}': {}", report.name, e),
            }
        }
        return Ok(());
    }

    // Run dispatch loops until Ctrl-C
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    run_dispatcher(reports, clock, cancel).await;

    Ok(())
}

/// Read the report-definitions snapshot
fn load_reports(config: &Config) -> Result<Vec<Report>> {
    let raw = std::fs::read_to_string(&config.reports_path).with_context(|| {
        format!(
            "cannot read report definitions at '{}'",
            config.reports_path
        )
    })?;
    let reports: Vec<Report> =
        serde_json::from_str(&raw).context("malformed report definitions")?;

    if reports.len() > config.max_reports {
        bail!(
            "snapshot holds {} reports, above MAX_REPORTS={}",
            reports.len(),
            config.max_reports
        );
    }

    Ok(reports)
}

/// Apply the registry contract: invalid reports are rejected, valid ones
/// are dispatched. Rejection is logged per report; an empty valid set is
/// a startup failure.
fn accept_reports(reports: Vec<Report>, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<Report>> {
    let total = reports.len();
    let mut accepted = Vec::with_capacity(total);

    for report in reports {
        match report.validate(now) {
            Ok(()) => accepted.push(report),
            Err(e) => warn!("{}", e),
        }
    }

    if accepted.is_empty() && total > 0 {
        bail!("all {} report definitions were rejected", total);
    }

    info!("Accepted {}/{} report definitions", accepted.len(), total);
    Ok(accepted)
}
