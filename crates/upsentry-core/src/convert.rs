// ── Raw result → Snapshot conversion ──
//
// Pure functions: no I/O, no clock. Identifiers the agent left out keep
// the `Snapshot` defaults; a value that is present but undecodable fails
// the whole conversion so a half-built snapshot never escapes.

use thiserror::Error;
use tracing::{debug, trace};

use upsentry_api::{ObjectId, RawResult, RawValue};

use crate::catalog::{AlarmCondition, AlarmSource, IdentifierSet, TelemetryField};
use crate::model::{BatteryStatus, OutputMode, Snapshot};

/// A present value that does not fit its field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode {field} from {identifier}: got '{value}', expected {expected}")]
pub struct DecodeError {
    pub field: TelemetryField,
    pub identifier: ObjectId,
    pub value: String,
    pub expected: &'static str,
}

/// Build a snapshot from one scalar fetch plus, for table-walk vendors,
/// the rows of the alarm table.
///
/// `alarm_rows` is ignored for vendors that report status and mode as
/// scalars. For table-walk vendors the status and mode scalars are
/// ignored instead.
pub fn build_snapshot(
    identifiers: &IdentifierSet,
    raw: &RawResult,
    alarm_rows: &[(ObjectId, RawValue)],
) -> Result<Snapshot, DecodeError> {
    let alarms = identifiers.vendor().profile().alarms;
    let mut snapshot = Snapshot::default();

    for (identifier, value) in raw {
        let Some(field) = identifiers.field_of(identifier) else {
            trace!(%identifier, "ignoring identifier outside the requested set");
            continue;
        };
        let invalid = |expected: &'static str| DecodeError {
            field,
            identifier: identifier.clone(),
            value: value.to_string(),
            expected,
        };

        match field {
            TelemetryField::Manufacturer => snapshot.manufacturer = decode_text(value),
            TelemetryField::BatteryRemainingMinutes => {
                snapshot.battery_remaining_minutes =
                    decode_count(value).ok_or_else(|| invalid("a non-negative integer"))?;
            }
            TelemetryField::BatteryChargeRemainingPercent => {
                snapshot.battery_charge_remaining_percent =
                    decode_count(value).ok_or_else(|| invalid("a non-negative integer"))?;
            }
            TelemetryField::SecondsOnBattery => {
                snapshot.seconds_on_battery =
                    decode_count(value).ok_or_else(|| invalid("a non-negative integer"))?;
            }
            TelemetryField::OutputPower => {
                snapshot.output_power = value.as_i64().ok_or_else(|| invalid("an integer"))?;
            }
            TelemetryField::BatteryStatus if alarms == AlarmSource::ScalarCodes => {
                snapshot.battery_status = value
                    .as_i64()
                    .and_then(BatteryStatus::from_code)
                    .ok_or_else(|| invalid("a battery status code (1-4)"))?;
            }
            TelemetryField::OutputMode if alarms == AlarmSource::ScalarCodes => {
                snapshot.output_mode = value
                    .as_i64()
                    .and_then(OutputMode::from_code)
                    .ok_or_else(|| invalid("an output source code (1-7)"))?;
            }
            TelemetryField::BatteryStatus | TelemetryField::OutputMode => {
                trace!(%field, "status scalar ignored, derived from alarm table");
            }
        }
    }

    if alarms == AlarmSource::TableWalk {
        if alarm_rows.is_empty() {
            trace!("no alarms present");
        }
        apply_alarms(&mut snapshot, alarm_rows);
    }

    Ok(snapshot)
}

/// Fold alarm-table rows over `snapshot` in row order; later rows win.
///
/// A row counts when its value is a known alarm identifier, or when the
/// row identifier itself is one.
pub fn apply_alarms(snapshot: &mut Snapshot, rows: &[(ObjectId, RawValue)]) {
    for (row, value) in rows {
        let alarm = value
            .as_object_id()
            .and_then(AlarmCondition::from_identifier)
            .or_else(|| AlarmCondition::from_identifier(row));

        match alarm {
            Some(AlarmCondition::OnBattery) => snapshot.output_mode = OutputMode::Battery,
            Some(AlarmCondition::LowBattery) => snapshot.battery_status = BatteryStatus::Low,
            Some(AlarmCondition::DepletedBattery) => {
                snapshot.battery_status = BatteryStatus::Depleted;
            }
            Some(AlarmCondition::InputBad) => debug!(%row, "input bad alarm present"),
            None => trace!(%row, %value, "unrecognized alarm row"),
        }
    }
}

pub(crate) fn decode_text(value: &RawValue) -> String {
    match value {
        RawValue::Text(s) => s.trim_end_matches('\0').to_owned(),
        RawValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn decode_count(value: &RawValue) -> Option<u32> {
    value.as_i64().and_then(|v| u32::try_from(v).ok())
}
