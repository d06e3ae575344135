#![allow(clippy::unwrap_used)]
// Integration tests for `SnmpTransport` against a local UDP socket that
// never answers. Exercises session setup and timeout handling without a
// real agent.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tokio::net::UdpSocket;

use upsentry_api::{Error, ObjectId, RawValue, SnmpVersion, Transport, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

const MANUFACTURER: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 1, 1, 0]);
const ALARM_TABLE: ObjectId = ObjectId::from_static(&[1, 3, 6, 1, 2, 1, 33, 1, 6, 2]);

/// Bind a socket that swallows every request. Kept alive by the caller.
async fn silent_agent() -> (UdpSocket, TransportConfig) {
    let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = socket.local_addr().unwrap().port();
    let config = TransportConfig {
        version: SnmpVersion::V1,
        timeout: Duration::from_millis(100),
        port,
    };
    (socket, config)
}

fn community() -> SecretString {
    SecretString::from("public".to_string())
}

// ── Timeout tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_get_times_out_against_silent_agent() {
    let (_agent, config) = silent_agent().await;
    let transport = config
        .connect(IpAddr::V4(Ipv4Addr::LOCALHOST), &community())
        .await
        .unwrap();

    let result = transport.get(&[MANUFACTURER]).await;

    assert!(
        matches!(result, Err(Error::Timeout { timeout_ms: 100 })),
        "expected Timeout error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_walk_times_out_against_silent_agent() {
    let (_agent, config) = silent_agent().await;
    let transport = config
        .connect(IpAddr::V4(Ipv4Addr::LOCALHOST), &community())
        .await
        .unwrap();

    let result = transport.walk(&ALARM_TABLE).await;

    assert!(matches!(result, Err(Error::Timeout { .. })));
    assert!(result.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_set_rejects_oversized_unsigned_before_sending() {
    let (_agent, config) = silent_agent().await;
    let transport = config
        .connect(IpAddr::V4(Ipv4Addr::LOCALHOST), &community())
        .await
        .unwrap();

    let result = transport
        .set(&[(MANUFACTURER, RawValue::Unsigned(u64::from(u32::MAX) + 1))])
        .await;

    assert!(
        matches!(result, Err(Error::UnsupportedValue { .. })),
        "expected UnsupportedValue error, got: {result:?}"
    );
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_endpoint_uses_configured_port() {
    let config = TransportConfig {
        port: 1161,
        ..TransportConfig::default()
    };
    let endpoint = config.endpoint(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));
    assert_eq!(endpoint.to_string(), "10.1.2.3:1161");
}

#[test]
fn test_default_transport_config() {
    let config = TransportConfig::default();
    assert_eq!(config.version, SnmpVersion::V1);
    assert_eq!(config.timeout, Duration::from_millis(1000));
    assert_eq!(config.port, 161);
}
