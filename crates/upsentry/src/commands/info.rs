//! `info`: one-shot identity and network settings.

use std::net::IpAddr;

use serde::Serialize;

use upsentry_core::{DeviceConfig, DeviceInformation, read_information};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, DetailRow};

#[derive(Serialize)]
struct InfoView {
    address: IpAddr,
    vendor: String,
    #[serde(flatten)]
    information: DeviceInformation,
}

pub async fn handle(device: &DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let (address, transport) = device.connect().await?;
    let information = read_information(&transport, &device.provisioning).await?;

    let view = InfoView {
        address,
        vendor: device.vendor.to_string(),
        information,
    };
    let out = output::render_single(global.output, &view, detail, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "enabled".into(),
        Some(false) => "disabled".into(),
        None => "-".into(),
    }
}

fn detail(v: &InfoView) -> String {
    output::render_detail(&[
        DetailRow::new("Address", v.address.to_string()),
        DetailRow::new("Vendor", v.vendor.clone()),
        DetailRow::new("Manufacturer", or_dash(v.information.manufacturer.as_deref())),
        DetailRow::new("DHCP", flag(v.information.ipv4_dhcp_enabled)),
        DetailRow::new("IPv4 address", or_dash(v.information.ipv4_address)),
        DetailRow::new("Auto restart", flag(v.information.auto_restart)),
    ])
}

fn plain(v: &InfoView) -> String {
    format!(
        "{}\t{}\t{}",
        v.address,
        or_dash(v.information.manufacturer.as_deref()),
        or_dash(v.information.ipv4_address),
    )
}
