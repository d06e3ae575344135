// ── Runtime device configuration ──
//
// Describes *which* UPS to talk to and how. Built by the CLI from a
// profile plus flags, then handed in; core never reads config files.

use std::net::IpAddr;
use std::time::Duration;

use secrecy::SecretString;

use upsentry_api::{SnmpTransport, TransportConfig};

use crate::catalog::{ProvisioningIdentifiers, Vendor};
use crate::error::CoreError;

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Community used when nothing else is configured.
pub const DEFAULT_COMMUNITY: &str = "public";

/// Configuration for one monitored device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Host name or IP literal, as given by the operator.
    pub host: String,
    pub vendor: Vendor,
    pub community: SecretString,
    /// Protocol version, port, and per-request timeout.
    pub transport: TransportConfig,
    pub poll_interval: Duration,
    pub provisioning: ProvisioningIdentifiers,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            vendor: Vendor::default(),
            community: SecretString::from(DEFAULT_COMMUNITY.to_owned()),
            transport: TransportConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            provisioning: ProvisioningIdentifiers::default(),
        }
    }

    /// Resolve the host and open a session to it.
    pub async fn connect(&self) -> Result<(IpAddr, SnmpTransport), CoreError> {
        let ip = upsentry_api::resolve(&self.host).await?;
        let transport = self.transport.connect(ip, &self.community).await?;
        Ok((ip, transport))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::new("10.0.0.9");
        assert_eq!(config.vendor, Vendor::Astrodyne);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.community.expose_secret(), "public");
        assert_eq!(config.transport.port, 161);
    }

    #[tokio::test]
    async fn unresolvable_host_fails_before_connecting() {
        let config = DeviceConfig::new("bad host name.invalid");
        let result = config.connect().await;
        assert!(matches!(result, Err(CoreError::AddressResolution { .. })));
    }
}
