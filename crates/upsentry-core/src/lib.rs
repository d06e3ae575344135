//! UPS telemetry domain logic.
//!
//! Sits between the SNMP transport in `upsentry-api` and the CLI:
//!
//! - **[`catalog`]**: vendor → identifier tables and alarm identifiers.
//! - **[`convert`]**: raw fetch results → [`Snapshot`].
//! - **[`detect`]**: edge-triggered change detection over consecutive
//!   snapshots.
//! - **[`Monitor`]**: the fixed-period poll loop, with skip-on-overrun and
//!   a [`PollReport`] broadcast.
//! - **[`apply_configuration`]**: static IPv4 provisioning with a
//!   separate commit.
//! - **[`read_information`]**: one-shot identity and network settings.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod event;
pub mod information;
pub mod model;
pub mod monitor;
pub mod provision;

// ── Primary re-exports ───────────────────────────────────────────
pub use catalog::{
    AlarmCondition, AlarmSource, IdentifierSet, ProvisioningIdentifiers, TelemetryField, Vendor,
    VendorProfile, identifiers_for,
};
pub use config::{DEFAULT_COMMUNITY, DEFAULT_POLL_INTERVAL, DeviceConfig};
pub use convert::{DecodeError, build_snapshot};
pub use detect::{Change, MonitorState, detect};
pub use error::CoreError;
pub use information::read_information;
pub use model::{BatteryStatus, DeviceInformation, FieldValue, OutputMode, Snapshot};
pub use monitor::{Monitor, PollOutcome, PollReport};
pub use provision::{WriteError, WriteReport, apply_configuration};
