// ── Structured log events ──
//
// Every poll and write outcome goes through one of these functions so the
// `event` field and the field names stay stable for log consumers.
// Unchanged polls are TRACE, changed or first polls INFO, failures ERROR.

use std::net::Ipv4Addr;

use tracing::{error, info, trace};

use crate::detect::Change;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::provision::WriteError;

pub fn poll_succeeded(snapshot: &Snapshot, change: &Change) {
    if change.log_at_info {
        info!(
            event = "PollSucceeded",
            manufacturer = %snapshot.manufacturer,
            battery_status = %snapshot.battery_status,
            charge_percent = snapshot.battery_charge_remaining_percent,
            minutes_remaining = snapshot.battery_remaining_minutes,
            seconds_on_battery = snapshot.seconds_on_battery,
            output_mode = %snapshot.output_mode,
            output_power = snapshot.output_power,
            changed = ?change.changed,
            "UPS status"
        );
    } else {
        trace!(
            event = "PollSucceeded",
            manufacturer = %snapshot.manufacturer,
            battery_status = %snapshot.battery_status,
            charge_percent = snapshot.battery_charge_remaining_percent,
            minutes_remaining = snapshot.battery_remaining_minutes,
            seconds_on_battery = snapshot.seconds_on_battery,
            output_mode = %snapshot.output_mode,
            output_power = snapshot.output_power,
            "UPS status unchanged"
        );
    }
}

pub fn poll_failed(err: &CoreError) {
    error!(
        event = "PollFailed",
        transient = err.is_transient(),
        error = %err,
        "UPS poll failed"
    );
}

pub fn write_succeeded(new_address: Ipv4Addr) {
    info!(
        event = "WriteSucceeded",
        %new_address,
        "network configuration applied"
    );
}

pub fn write_failed(err: &WriteError) {
    error!(
        event = "WriteFailed",
        identifier = %err.identifier(),
        staged = err.is_staged(),
        error = %err,
        "network configuration not applied"
    );
}
