//! SNMP access layer for UPS telemetry.
//!
//! - **[`Transport`]**: the request/response contract the core polls
//!   through (scalar GET, subtree walk, SET).
//! - **[`SnmpTransport`]**: v1/v2c implementation on `snmp2`.
//! - **[`resolve`]**: host-or-literal address resolution.
//! - **[`ObjectId`] / [`RawValue`]**: owned identifiers and values,
//!   detached from the wire buffer.

pub mod error;
pub mod oid;
pub mod resolve;
pub mod snmp;
pub mod transport;
pub mod value;

pub use error::Error;
pub use oid::ObjectId;
pub use resolve::resolve;
pub use snmp::SnmpTransport;
pub use transport::{DEFAULT_PORT, SnmpVersion, Transport, TransportConfig};
pub use value::{RawResult, RawValue, SetResponse};
