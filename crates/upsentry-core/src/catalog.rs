// ── Vendor catalog ──
//
// Static mapping from logical telemetry fields to UPS-MIB (RFC 1628)
// identifiers, keyed by vendor. Only output power differs structurally
// between vendors; the alarm strategy differs by profile.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use upsentry_api::ObjectId;

// ── Identifiers ─────────────────────────────────────────────────────

pub const MANUFACTURER: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 1, 1, 0]);
pub const BATTERY_STATUS: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 2, 1, 0]);
pub const SECONDS_ON_BATTERY: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 2, 2, 0]);
pub const CHARGE_REMAINING_MINUTES: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 2, 3, 0]);
pub const CHARGE_REMAINING_PERCENT: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 2, 4, 0]);
pub const OUTPUT_SOURCE: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 4, 1, 0]);
pub const OUTPUT_POWER_ASTRODYNE: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 4, 4, 1, 4, 0]);
pub const OUTPUT_POWER_TRIPP_LITE: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 4, 4, 1, 4, 1]);

/// `upsAlarmTable`; rows carry well-known alarm identifiers as values.
pub const ALARM_TABLE: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 2]);

const ALARM_ON_BATTERY: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 3, 2]);
const ALARM_LOW_BATTERY: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 3, 3]);
const ALARM_DEPLETED_BATTERY: ObjectId =
    ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 3, 4]);
const ALARM_INPUT_BAD: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 3, 6]);

// Network-management card settings. Firmware specific; every entry can be
// overridden per profile.
const NMC_IPV4_DHCP: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 4, 1, 850, 1, 1, 5, 1, 0]);
const NMC_IPV4_ADDRESS: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 4, 1, 850, 1, 1, 5, 2, 0]);
const NMC_AUTO_RESTART: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 4, 1, 850, 1, 1, 5, 3, 0]);
const NMC_APPLY: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 4, 1, 850, 1, 1, 5, 4, 0]);

// ── Enumerations ────────────────────────────────────────────────────

/// Supported device families.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Vendor {
    /// Alarm state is derived from an `upsAlarmTable` walk.
    #[default]
    Astrodyne,
    /// Battery status and output source are reported as plain scalars.
    TrippLite,
}

/// Logical telemetry fields of a [`Snapshot`](crate::model::Snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TelemetryField {
    BatteryStatus,
    BatteryRemainingMinutes,
    BatteryChargeRemainingPercent,
    Manufacturer,
    OutputMode,
    SecondsOnBattery,
    OutputPower,
}

/// Well-known alarms (`upsWellKnownAlarms`) the builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum AlarmCondition {
    OnBattery,
    LowBattery,
    DepletedBattery,
    InputBad,
}

impl AlarmCondition {
    pub fn identifier(self) -> ObjectId {
        match self {
            Self::OnBattery => ALARM_ON_BATTERY,
            Self::LowBattery => ALARM_LOW_BATTERY,
            Self::DepletedBattery => ALARM_DEPLETED_BATTERY,
            Self::InputBad => ALARM_INPUT_BAD,
        }
    }

    pub fn from_identifier(identifier: &ObjectId) -> Option<Self> {
        Self::iter().find(|alarm| alarm.identifier() == *identifier)
    }
}

// ── Vendor dispatch table ───────────────────────────────────────────

/// How a vendor's battery status and output mode are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmSource {
    /// Walk [`ALARM_TABLE`] and fold well-known alarms over the defaults.
    TableWalk,
    /// Decode `upsBatteryStatus` / `upsOutputSource` codes directly.
    ScalarCodes,
}

/// Per-vendor catalog entry.
#[derive(Debug)]
pub struct VendorProfile {
    pub vendor: Vendor,
    pub output_power: ObjectId,
    pub alarms: AlarmSource,
}

static ASTRODYNE: VendorProfile = VendorProfile {
    vendor: Vendor::Astrodyne,
    output_power: OUTPUT_POWER_ASTRODYNE,
    alarms: AlarmSource::TableWalk,
};

static TRIPP_LITE: VendorProfile = VendorProfile {
    vendor: Vendor::TrippLite,
    output_power: OUTPUT_POWER_TRIPP_LITE,
    alarms: AlarmSource::ScalarCodes,
};

impl Vendor {
    pub fn profile(self) -> &'static VendorProfile {
        match self {
            Self::Astrodyne => &ASTRODYNE,
            Self::TrippLite => &TRIPP_LITE,
        }
    }
}

/// Identifier for `field` on `vendor`.
pub fn identifier(vendor: Vendor, field: TelemetryField) -> ObjectId {
    match field {
        TelemetryField::BatteryStatus => BATTERY_STATUS,
        TelemetryField::BatteryRemainingMinutes => CHARGE_REMAINING_MINUTES,
        TelemetryField::BatteryChargeRemainingPercent => CHARGE_REMAINING_PERCENT,
        TelemetryField::Manufacturer => MANUFACTURER,
        TelemetryField::OutputMode => OUTPUT_SOURCE,
        TelemetryField::SecondsOnBattery => SECONDS_ON_BATTERY,
        TelemetryField::OutputPower => vendor.profile().output_power.clone(),
    }
}

// ── Identifier sets ─────────────────────────────────────────────────

/// Ordered, duplicate-free identifiers requested in one scalar fetch.
///
/// Built once per vendor and reused for every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSet {
    vendor: Vendor,
    fields: Vec<TelemetryField>,
    identifiers: Vec<ObjectId>,
}

impl IdentifierSet {
    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn identifiers(&self) -> &[ObjectId] {
        &self.identifiers
    }

    /// Field mapped to `identifier`, if it belongs to this set.
    pub fn field_of(&self, identifier: &ObjectId) -> Option<TelemetryField> {
        self.identifiers
            .iter()
            .position(|candidate| candidate == identifier)
            .and_then(|idx| self.fields.get(idx).copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (TelemetryField, &ObjectId)> {
        self.fields.iter().copied().zip(self.identifiers.iter())
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// The identifier set polled for `vendor`.
pub fn identifiers_for(vendor: Vendor) -> IdentifierSet {
    identifiers_for_fields(vendor, TelemetryField::iter())
}

/// Identifier set covering exactly `fields`, in the given order.
pub fn identifiers_for_fields(
    vendor: Vendor,
    fields: impl IntoIterator<Item = TelemetryField>,
) -> IdentifierSet {
    let mut set = IdentifierSet {
        vendor,
        fields: Vec::new(),
        identifiers: Vec::new(),
    };
    for field in fields {
        if set.fields.contains(&field) {
            continue;
        }
        set.identifiers.push(identifier(vendor, field));
        set.fields.push(field);
    }
    set
}

// ── Provisioning identifiers ────────────────────────────────────────

/// Network-management settings read by `info` and pushed by `write`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningIdentifiers {
    pub ipv4_dhcp_enabled: ObjectId,
    pub ipv4_address: ObjectId,
    pub auto_restart: ObjectId,
    /// Writing `1` applies staged settings.
    pub apply: ObjectId,
}

impl Default for ProvisioningIdentifiers {
    fn default() -> Self {
        Self {
            ipv4_dhcp_enabled: NMC_IPV4_DHCP,
            ipv4_address: NMC_IPV4_ADDRESS,
            auto_restart: NMC_AUTO_RESTART,
            apply: NMC_APPLY,
        }
    }
}
