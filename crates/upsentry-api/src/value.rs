// ── Raw values ──
//
// Untyped values as returned by the agent, detached from the SNMP
// session's receive buffer so they can outlive a single request.

use std::fmt;
use std::net::Ipv4Addr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::oid::ObjectId;

/// A single agent value, owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Integer(i64),
    /// Counter32 / Gauge32 / Unsigned32 / TimeTicks / Counter64.
    Unsigned(u64),
    Text(String),
    ObjectId(ObjectId),
    IpAddress(Ipv4Addr),
    Null,
}

impl RawValue {
    /// Interpret the value as a signed integer.
    ///
    /// Numeric text is accepted because some agents report gauges as
    /// DisplayString.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Unsigned(v) => i64::try_from(*v).ok(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::ObjectId(_) | Self::IpAddress(_) | Self::Null => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Self::ObjectId(oid) => Some(oid),
            _ => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            Self::IpAddress(ip) => Some(*ip),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::ObjectId(oid) => write!(f, "{oid}"),
            Self::IpAddress(ip) => write!(f, "{ip}"),
            Self::Null => f.write_str("null"),
        }
    }
}

/// Identifier → value pairs from one scalar fetch, in request order.
///
/// Identifiers the agent does not implement are simply absent.
pub type RawResult = IndexMap<ObjectId, RawValue>;

/// Agent response to a SET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetResponse {
    /// SNMP error-status; `0` means the whole PDU was accepted.
    pub error_status: u32,
    /// 1-based index of the offending varbind when `error_status != 0`.
    pub error_index: u32,
    /// Varbinds echoed back by the agent.
    pub varbinds: Vec<(ObjectId, RawValue)>,
}

impl SetResponse {
    pub fn is_accepted(&self) -> bool {
        self.error_status == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_decodes_as_integer() {
        assert_eq!(RawValue::Text(" 42 ".into()).as_i64(), Some(42));
        assert_eq!(RawValue::Text("n/a".into()).as_i64(), None);
    }

    #[test]
    fn unsigned_out_of_range_does_not_decode() {
        assert_eq!(RawValue::Unsigned(u64::MAX).as_i64(), None);
        assert_eq!(RawValue::Unsigned(7).as_i64(), Some(7));
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(RawValue::Integer(-3).to_string(), "-3");
        assert_eq!(
            RawValue::IpAddress(Ipv4Addr::new(10, 0, 0, 5)).to_string(),
            "10.0.0.5"
        );
    }
}
