// One-shot read of device identity and network settings.

use tracing::debug;

use upsentry_api::{ObjectId, RawResult, Transport};

use crate::catalog::{MANUFACTURER, ProvisioningIdentifiers};
use crate::convert::decode_text;
use crate::error::CoreError;
use crate::model::DeviceInformation;

pub async fn read_information<T: Transport>(
    transport: &T,
    identifiers: &ProvisioningIdentifiers,
) -> Result<DeviceInformation, CoreError> {
    let request = [
        MANUFACTURER,
        identifiers.ipv4_dhcp_enabled.clone(),
        identifiers.ipv4_address.clone(),
        identifiers.auto_restart.clone(),
    ];
    let raw = transport.get(&request).await?;

    Ok(DeviceInformation {
        manufacturer: raw.get(&MANUFACTURER).map(decode_text),
        ipv4_dhcp_enabled: flag(&raw, &identifiers.ipv4_dhcp_enabled),
        ipv4_address: raw.get(&identifiers.ipv4_address).and_then(|value| {
            let ip = value.as_ipv4();
            if ip.is_none() {
                debug!(%value, "address value is not IPv4");
            }
            ip
        }),
        auto_restart: flag(&raw, &identifiers.auto_restart),
    })
}

/// `1` is true; any other integer is false.
fn flag(raw: &RawResult, identifier: &ObjectId) -> Option<bool> {
    let value = raw.get(identifier)?;
    match value.as_i64() {
        Some(v) => Some(v == 1),
        None => {
            debug!(%identifier, %value, "flag value is not an integer");
            None
        }
    }
}
