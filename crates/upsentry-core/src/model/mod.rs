// ── Domain model ──
//
// Decoded, vendor-neutral telemetry. Consumers (CLI, tests) depend on
// these types only; raw identifiers stay in the catalog and builder.

pub mod information;
pub mod snapshot;

pub use information::DeviceInformation;
pub use snapshot::{BatteryStatus, FieldValue, OutputMode, Snapshot};
