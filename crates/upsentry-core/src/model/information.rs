// ── Device information ──

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Identity and network-management settings read from the device.
///
/// Fields the agent did not answer are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInformation {
    pub manufacturer: Option<String>,
    pub ipv4_dhcp_enabled: Option<bool>,
    pub ipv4_address: Option<Ipv4Addr>,
    pub auto_restart: Option<bool>,
}
