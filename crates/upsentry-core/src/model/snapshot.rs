// ── Telemetry snapshot types ──

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::catalog::TelemetryField;

/// `upsBatteryStatus` (RFC 1628).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum BatteryStatus {
    Unknown,
    #[default]
    Normal,
    Low,
    Depleted,
}

impl BatteryStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Unknown),
            2 => Some(Self::Normal),
            3 => Some(Self::Low),
            4 => Some(Self::Depleted),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 1,
            Self::Normal => 2,
            Self::Low => 3,
            Self::Depleted => 4,
        }
    }
}

/// `upsOutputSource` (RFC 1628).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Other,
    None,
    #[default]
    Normal,
    Bypass,
    Battery,
    Booster,
    Reducer,
}

impl OutputMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Other),
            2 => Some(Self::None),
            3 => Some(Self::Normal),
            4 => Some(Self::Bypass),
            5 => Some(Self::Battery),
            6 => Some(Self::Booster),
            7 => Some(Self::Reducer),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Other => 1,
            Self::None => 2,
            Self::Normal => 3,
            Self::Bypass => 4,
            Self::Battery => 5,
            Self::Booster => 6,
            Self::Reducer => 7,
        }
    }
}

/// One decoded poll of a device.
///
/// Identifiers the agent did not answer keep their defaults: empty
/// manufacturer, zero counters, `Normal` status and mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub manufacturer: String,
    pub battery_status: BatteryStatus,
    pub battery_remaining_minutes: u32,
    /// Passed through as reported; not clamped to 100.
    pub battery_charge_remaining_percent: u32,
    pub output_mode: OutputMode,
    pub seconds_on_battery: u32,
    /// Watts.
    pub output_power: i64,
}

/// Borrowed view of a single snapshot field, for rendering and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Count(u32),
    Integer(i64),
    BatteryStatus(BatteryStatus),
    OutputMode(OutputMode),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Count(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::BatteryStatus(s) => write!(f, "{s}"),
            Self::OutputMode(m) => write!(f, "{m}"),
        }
    }
}

impl Snapshot {
    pub fn field(&self, field: TelemetryField) -> FieldValue<'_> {
        match field {
            TelemetryField::BatteryStatus => FieldValue::BatteryStatus(self.battery_status),
            TelemetryField::BatteryRemainingMinutes => {
                FieldValue::Count(self.battery_remaining_minutes)
            }
            TelemetryField::BatteryChargeRemainingPercent => {
                FieldValue::Count(self.battery_charge_remaining_percent)
            }
            TelemetryField::Manufacturer => FieldValue::Text(&self.manufacturer),
            TelemetryField::OutputMode => FieldValue::OutputMode(self.output_mode),
            TelemetryField::SecondsOnBattery => FieldValue::Count(self.seconds_on_battery),
            TelemetryField::OutputPower => FieldValue::Integer(self.output_power),
        }
    }

    /// Every field with its value, in display order.
    pub fn fields(&self) -> [(TelemetryField, FieldValue<'_>); 7] {
        [
            TelemetryField::Manufacturer,
            TelemetryField::BatteryStatus,
            TelemetryField::BatteryChargeRemainingPercent,
            TelemetryField::BatteryRemainingMinutes,
            TelemetryField::SecondsOnBattery,
            TelemetryField::OutputMode,
            TelemetryField::OutputPower,
        ]
        .map(|f| (f, self.field(f)))
    }

    /// Whether the device is currently running from its battery.
    pub fn on_battery(&self) -> bool {
        self.output_mode == OutputMode::Battery
    }
}
