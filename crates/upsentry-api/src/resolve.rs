// Address resolution: literal parse first, DNS second, IPv4 preferred.

use std::net::IpAddr;

use tracing::debug;

use crate::error::Error;

/// Resolve a host name or IP literal to a single address.
///
/// An IP literal is returned as-is without touching DNS. Names are
/// looked up and the first IPv4 result wins; a name with only IPv6
/// records is rejected.
pub async fn resolve(host: &str) -> Result<IpAddr, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::InvalidAddress { host: host.to_owned() });
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| {
            debug!(host, error = %e, "name lookup failed");
            Error::InvalidAddress { host: host.to_owned() }
        })?;

    first_ipv4(addrs.map(|sa| sa.ip())).ok_or_else(|| Error::InvalidAddress {
        host: host.to_owned(),
    })
}

fn first_ipv4(candidates: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    candidates.into_iter().find(IpAddr::is_ipv4)
}
