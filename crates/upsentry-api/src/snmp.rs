// SNMP v1/v2c transport
//
// Wraps a single `snmp2::AsyncSession` behind a mutex so only one request
// is ever outstanding on the socket. Responses are copied into owned
// `RawValue`s before the lock is released, since `snmp2` PDUs borrow the
// session's receive buffer.
//
// A request abandoned on timeout can still be answered later. That reply
// would sit in the socket and be read as the answer to the next request,
// so the session is replaced on a fresh socket whenever an exchange times
// out or returns a reply that does not match what was asked.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use snmp2::{AsyncSession, Value};
use tokio::sync::Mutex;
use tokio::time::error::Elapsed;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::oid::ObjectId;
use crate::transport::{SnmpVersion, Transport};
use crate::value::{RawResult, RawValue, SetResponse};

/// v1 `noSuchName` error-status; v2c agents use exception values instead.
const NO_SUCH_NAME: u32 = 2;

/// Production [`Transport`] speaking SNMP over UDP.
pub struct SnmpTransport {
    session: Mutex<AsyncSession>,
    endpoint: SocketAddr,
    community: SecretString,
    version: SnmpVersion,
    timeout: Duration,
}

impl SnmpTransport {
    /// Open a session. No packet is sent until the first request.
    pub async fn connect(
        endpoint: SocketAddr,
        community: &SecretString,
        version: SnmpVersion,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let session = open(endpoint, community, version).await?;
        debug!(%endpoint, ?version, "SNMP session opened");

        Ok(Self {
            session: Mutex::new(session),
            endpoint,
            community: SecretString::from(community.expose_secret().to_owned()),
            version,
            timeout,
        })
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    fn timeout_error(&self) -> Error {
        Error::Timeout {
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Inspect the outcome of an exchange and replace the session when the
    /// socket can no longer be trusted to pair replies with requests.
    async fn settle<T>(
        &self,
        session: &mut AsyncSession,
        outcome: Result<Result<T, Error>, Elapsed>,
    ) -> Result<T, Error> {
        let result = outcome.unwrap_or_else(|_| Err(self.timeout_error()));
        if result.as_ref().is_err_and(desynchronizes) {
            self.reopen(session).await;
        }
        result
    }

    async fn reopen(&self, session: &mut AsyncSession) {
        match open(self.endpoint, &self.community, self.version).await {
            Ok(fresh) => {
                *session = fresh;
                debug!(endpoint = %self.endpoint, "SNMP session reopened");
            }
            Err(e) => warn!(
                endpoint = %self.endpoint,
                error = %e,
                "could not reopen SNMP session"
            ),
        }
    }
}

impl Transport for SnmpTransport {
    async fn get(&self, identifiers: &[ObjectId]) -> Result<RawResult, Error> {
        let mut session = self.session.lock().await;
        let outcome = tokio::time::timeout(self.timeout, get_each(&mut session, identifiers)).await;
        self.settle(&mut session, outcome).await
    }

    async fn walk(&self, root: &ObjectId) -> Result<Vec<(ObjectId, RawValue)>, Error> {
        let mut session = self.session.lock().await;
        let outcome = tokio::time::timeout(self.timeout, walk_subtree(&mut session, root)).await;
        self.settle(&mut session, outcome).await
    }

    async fn set(&self, values: &[(ObjectId, RawValue)]) -> Result<SetResponse, Error> {
        let oids = values
            .iter()
            .map(|(identifier, _)| identifier.to_snmp())
            .collect::<Result<Vec<_>, _>>()?;
        let encoded = values
            .iter()
            .map(|(identifier, value)| encode_value(identifier, value))
            .collect::<Result<Vec<_>, _>>()?;
        let pairs: Vec<_> = oids.iter().zip(encoded).collect();

        let mut session = self.session.lock().await;
        let outcome = tokio::time::timeout(self.timeout, set_all(&mut session, &pairs)).await;
        self.settle(&mut session, outcome).await
    }
}

/// Failures after which the next reply on this socket may belong to an
/// earlier request.
fn desynchronizes(err: &Error) -> bool {
    matches!(
        err,
        Error::Timeout { .. }
            | Error::UnexpectedReply { .. }
            | Error::Snmp(snmp2::Error::RequestIdMismatch)
    )
}

async fn open(
    endpoint: SocketAddr,
    community: &SecretString,
    version: SnmpVersion,
) -> Result<AsyncSession, Error> {
    let community = community.expose_secret().as_bytes();
    let session = match version {
        SnmpVersion::V1 => AsyncSession::new_v1(endpoint, community, 0).await?,
        SnmpVersion::V2c => AsyncSession::new_v2c(endpoint, community, 0).await?,
    };
    Ok(session)
}

async fn get_each(
    session: &mut AsyncSession,
    identifiers: &[ObjectId],
) -> Result<RawResult, Error> {
    let mut result = RawResult::with_capacity(identifiers.len());

    // One GET per identifier: a v1 agent fails a whole multi-varbind
    // PDU with noSuchName if any single OID is unsupported.
    for identifier in identifiers {
        let oid = identifier.to_snmp()?;
        let pdu = session.get(&oid).await?;

        if pdu.error_status == NO_SUCH_NAME {
            trace!(%identifier, "agent reports noSuchName");
            continue;
        }
        if pdu.error_status != 0 {
            return Err(Error::Agent {
                status: pdu.error_status,
                index: pdu.error_index,
            });
        }

        for (answered, value) in pdu.varbinds {
            let answered = ObjectId::from_snmp(&answered)?;
            if answered != *identifier {
                return Err(Error::UnexpectedReply {
                    requested: identifier.to_string(),
                    received: answered.to_string(),
                });
            }
            match convert_value(&value) {
                Some(raw) => {
                    trace!(%identifier, value = %raw, "GET");
                    result.insert(answered, raw);
                }
                None => trace!(%identifier, "identifier not implemented by agent"),
            }
        }
    }
    Ok(result)
}

async fn walk_subtree(
    session: &mut AsyncSession,
    root: &ObjectId,
) -> Result<Vec<(ObjectId, RawValue)>, Error> {
    let mut rows = Vec::new();
    let mut cursor = root.clone();

    loop {
        let oid = cursor.to_snmp()?;
        let pdu = session.getnext(&oid).await?;
        if pdu.error_status != 0 {
            // v1 signals end-of-MIB with noSuchName
            break;
        }

        let Some((next_oid, value)) = pdu.varbinds.into_iter().next() else {
            break;
        };
        let Ok(next) = ObjectId::from_snmp(&next_oid) else {
            break;
        };
        // Leaving the subtree, or an agent that fails to advance.
        if !next.is_under(root) || next <= cursor {
            break;
        }
        let Some(raw) = convert_value(&value) else {
            break;
        };
        trace!(identifier = %next, value = %raw, "GETNEXT");
        rows.push((next.clone(), raw));
        cursor = next;
    }

    debug!(%root, rows = rows.len(), "walk complete");
    Ok(rows)
}

async fn set_all(
    session: &mut AsyncSession,
    pairs: &[(&snmp2::Oid<'_>, Value<'_>)],
) -> Result<SetResponse, Error> {
    let pdu = session.set(pairs).await?;

    let mut varbinds = Vec::new();
    for (oid, value) in pdu.varbinds {
        if let (Ok(identifier), Some(raw)) = (ObjectId::from_snmp(&oid), convert_value(&value)) {
            varbinds.push((identifier, raw));
        }
    }
    debug!(
        count = pairs.len(),
        error_status = pdu.error_status,
        "SET response"
    );

    Ok(SetResponse {
        error_status: pdu.error_status,
        error_index: pdu.error_index,
        varbinds,
    })
}

/// Copy an `snmp2` value out of the receive buffer.
///
/// Returns `None` for the v2c exception values (noSuchObject,
/// noSuchInstance, endOfMibView) and for constructed types.
fn convert_value(value: &Value<'_>) -> Option<RawValue> {
    let raw = match value {
        Value::Boolean(b) => RawValue::Integer(i64::from(*b)),
        Value::Null => RawValue::Null,
        Value::Integer(v) => RawValue::Integer(*v),
        Value::OctetString(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        Value::ObjectIdentifier(oid) => {
            let text = oid.to_string();
            text.parse::<ObjectId>()
                .map_or(RawValue::Text(text), RawValue::ObjectId)
        }
        Value::IpAddress(octets) => RawValue::IpAddress(Ipv4Addr::from(*octets)),
        Value::Counter32(v) | Value::Unsigned32(v) | Value::Timeticks(v) => {
            RawValue::Unsigned(u64::from(*v))
        }
        Value::Counter64(v) => RawValue::Unsigned(*v),
        _ => return None,
    };
    Some(raw)
}

fn encode_value<'a>(identifier: &ObjectId, value: &'a RawValue) -> Result<Value<'a>, Error> {
    let encoded = match value {
        RawValue::Integer(v) => Value::Integer(*v),
        RawValue::Unsigned(v) => {
            Value::Unsigned32(u32::try_from(*v).map_err(|_| Error::UnsupportedValue {
                identifier: identifier.to_string(),
                reason: format!("{v} does not fit Unsigned32"),
            })?)
        }
        RawValue::Text(s) => Value::OctetString(s.as_bytes()),
        RawValue::ObjectId(oid) => Value::ObjectIdentifier(oid.to_snmp()?),
        RawValue::IpAddress(ip) => Value::IpAddress(ip.octets()),
        RawValue::Null => Value::Null,
    };
    Ok(encoded)
}
