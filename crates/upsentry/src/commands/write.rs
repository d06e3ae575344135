//! `write`: push a static IPv4 configuration and commit it.

use std::net::{IpAddr, Ipv4Addr};

use upsentry_core::{DeviceConfig, WriteReport, apply_configuration};

use crate::cli::{GlobalOpts, WriteArgs};
use crate::error::CliError;
use crate::output::{self, DetailRow};

pub async fn handle(
    device: &DeviceConfig,
    args: WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = args.new_address.unwrap_or_else(|| device.host.clone());
    let new_address = resolve_ipv4(&target).await?;

    let (_, transport) = device.connect().await?;
    let report = apply_configuration(&transport, &device.provisioning, new_address).await?;

    let out = output::render_single(global.output, &report, detail, |r| {
        r.ipv4_address.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The address to assign must resolve to IPv4.
async fn resolve_ipv4(host: &str) -> Result<Ipv4Addr, CliError> {
    match upsentry_api::resolve(host).await {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        Ok(IpAddr::V6(v6)) => Err(CliError::Validation {
            field: "new-address".into(),
            reason: format!("{v6} is not an IPv4 address"),
        }),
        Err(_) => Err(CliError::AddressResolution {
            host: host.to_owned(),
        }),
    }
}

fn detail(r: &WriteReport) -> String {
    let staged = r
        .staged
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    output::render_detail(&[
        DetailRow::new("IPv4 address", r.ipv4_address.to_string()),
        DetailRow::new("DHCP", "disabled"),
        DetailRow::new("Staged", staged),
        DetailRow::new("Committed via", r.committed.to_string()),
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ipv4_literal_is_used_verbatim() {
        let addr = resolve_ipv4("192.168.10.40").await.unwrap();
        assert_eq!(addr, Ipv4Addr::new(192, 168, 10, 40));
    }

    #[tokio::test]
    async fn ipv6_literal_is_rejected() {
        let err = resolve_ipv4("fe80::1").await.unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[tokio::test]
    async fn unresolvable_name_maps_to_address_error() {
        let err = resolve_ipv4("no-such-host.invalid").await.unwrap_err();
        assert!(matches!(err, CliError::AddressResolution { .. }));
    }
}
