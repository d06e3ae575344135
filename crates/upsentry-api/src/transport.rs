// Transport contract and shared session configuration.
//
// The core only speaks to `Transport`; `SnmpTransport` is the production
// implementation, tests substitute in-memory stubs.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::oid::ObjectId;
use crate::snmp::SnmpTransport;
use crate::value::{RawResult, RawValue, SetResponse};

/// Default SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// Request/response access to one device.
///
/// Every call is bounded by the implementation's timeout; a timeout is
/// reported as [`Error::Timeout`], never as a hang.
pub trait Transport: Send + Sync {
    /// Scalar fetch. Identifiers the agent does not implement are omitted
    /// from the result rather than failing the call.
    fn get(&self, identifiers: &[ObjectId]) -> impl Future<Output = Result<RawResult, Error>> + Send;

    /// Walk every identifier strictly under `root`, in agent order.
    fn walk(
        &self,
        root: &ObjectId,
    ) -> impl Future<Output = Result<Vec<(ObjectId, RawValue)>, Error>> + Send;

    /// Send all pairs in a single SET PDU.
    fn set(
        &self,
        values: &[(ObjectId, RawValue)],
    ) -> impl Future<Output = Result<SetResponse, Error>> + Send;
}

/// SNMP protocol version. v3 is not supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    #[default]
    V1,
    V2c,
}

/// Shared transport configuration for opening sessions.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub version: SnmpVersion,
    pub timeout: Duration,
    pub port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            version: SnmpVersion::V1,
            timeout: Duration::from_millis(1000),
            port: DEFAULT_PORT,
        }
    }
}

impl TransportConfig {
    /// Socket address of the agent for a resolved host.
    pub fn endpoint(&self, ip: IpAddr) -> SocketAddr {
        SocketAddr::new(ip, self.port)
    }

    /// Open an SNMP session to `ip` using this configuration.
    pub async fn connect(&self, ip: IpAddr, community: &SecretString) -> Result<SnmpTransport, Error> {
        SnmpTransport::connect(self.endpoint(ip), community, self.version, self.timeout).await
    }
}
