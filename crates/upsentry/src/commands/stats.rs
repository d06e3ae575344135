//! `stats`: run the monitor and print snapshots as they change.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info_span, warn};

use upsentry_core::{
    BatteryStatus, DeviceConfig, FieldValue, Monitor, MonitorState, OutputMode, PollOutcome,
    PollReport, Snapshot, TelemetryField,
};

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;
use crate::output::{self, DetailRow, Severity};

#[derive(Serialize)]
struct StatsView<'a> {
    at: String,
    #[serde(flatten)]
    snapshot: &'a Snapshot,
}

pub async fn handle(
    device: &DeviceConfig,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let period = match args.interval {
        Some(ms) => Duration::from_millis(upsentry_config::positive("interval", ms)?),
        None => device.poll_interval,
    };

    let (address, transport) = device.connect().await?;
    let monitor = Monitor::new(transport, device.vendor, period);
    let mut reports = monitor.subscribe();

    let cancel = CancellationToken::new();
    let span = info_span!("monitor", %address);
    let handle = tokio::spawn(monitor.run(cancel.clone()).instrument(span));

    let color = output::should_color(global.color);
    let relayed = relay(
        &mut reports,
        tokio::signal::ctrl_c(),
        args.count,
        |report| {
            let PollOutcome::Succeeded { snapshot, change } = &report.outcome else {
                return Ok(());
            };
            if change.log_at_info {
                let view = StatsView {
                    at: report.at.to_rfc3339(),
                    snapshot,
                };
                let out =
                    output::render_single(global.output, &view, |v| detail(v, color), plain)?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        },
    )
    .await;

    cancel.cancel();
    join_monitor(handle).await;
    relayed.map(|_| ())
}

/// Feed reports to `emit` until `interrupt` resolves, the monitor goes
/// away, or `count` polls have completed. Returns the polls seen.
async fn relay<I: Future>(
    reports: &mut broadcast::Receiver<PollReport>,
    interrupt: I,
    count: Option<u64>,
    mut emit: impl FnMut(&PollReport) -> Result<(), CliError>,
) -> Result<u64, CliError> {
    tokio::pin!(interrupt);
    let mut completed: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut interrupt => break,
            received = reports.recv() => {
                let report = match received {
                    Ok(report) => report,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "output fell behind the monitor");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                completed += 1;
                emit(&report)?;

                if count.is_some_and(|n| completed >= n) {
                    break;
                }
            }
        }
    }
    Ok(completed)
}

/// Wait for the monitor task. `None` if it panicked or was aborted.
async fn join_monitor(handle: JoinHandle<MonitorState>) -> Option<MonitorState> {
    match handle.await {
        Ok(state) => Some(state),
        Err(e) => {
            warn!(error = %e, "monitor task ended abnormally");
            None
        }
    }
}

fn label(field: TelemetryField) -> &'static str {
    match field {
        TelemetryField::Manufacturer => "Manufacturer",
        TelemetryField::BatteryStatus => "Battery status",
        TelemetryField::BatteryChargeRemainingPercent => "Charge (%)",
        TelemetryField::BatteryRemainingMinutes => "Runtime (min)",
        TelemetryField::SecondsOnBattery => "On battery (s)",
        TelemetryField::OutputMode => "Output source",
        TelemetryField::OutputPower => "Output power (W)",
    }
}

fn severity(value: FieldValue<'_>) -> Severity {
    match value {
        FieldValue::BatteryStatus(BatteryStatus::Normal)
        | FieldValue::OutputMode(OutputMode::Normal) => Severity::Ok,
        FieldValue::BatteryStatus(BatteryStatus::Low | BatteryStatus::Unknown)
        | FieldValue::OutputMode(OutputMode::Bypass | OutputMode::Booster | OutputMode::Reducer) => {
            Severity::Warn
        }
        FieldValue::BatteryStatus(BatteryStatus::Depleted)
        | FieldValue::OutputMode(OutputMode::Battery | OutputMode::None) => Severity::Critical,
        _ => Severity::Neutral,
    }
}

fn detail(v: &StatsView<'_>, color: bool) -> String {
    let mut rows = vec![DetailRow::new("Time", v.at.clone())];
    rows.extend(v.snapshot.fields().into_iter().map(|(field, value)| {
        DetailRow::new(label(field), output::paint(&value.to_string(), severity(value), color))
    }));
    output::render_detail(&rows)
}

fn plain(v: &StatsView<'_>) -> String {
    let s = v.snapshot;
    format!(
        "{} status={} charge={} runtime={} on_battery={} source={} power={}",
        v.at,
        s.battery_status,
        s.battery_charge_remaining_percent,
        s.battery_remaining_minutes,
        s.seconds_on_battery,
        s.output_mode,
        s.output_power,
    )
}
