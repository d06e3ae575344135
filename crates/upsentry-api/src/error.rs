use thiserror::Error;

/// Top-level error type for the `upsentry-api` crate.
///
/// Covers every failure mode of the transport layer: session setup,
/// SNMP exchanges, timeouts, and identifier/address parsing.
/// `upsentry-core` maps these into poll and write outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Socket setup or I/O failure (bind, connect, send).
    #[error("SNMP transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The SNMP library rejected a request or could not decode a response.
    #[error("SNMP request failed: {0}")]
    Snmp(#[from] snmp2::Error),

    /// Request timed out.
    #[error("SNMP request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The agent answered with a non-zero error-status that is not a
    /// "no such name" condition.
    #[error("agent returned error-status {status} at index {index}")]
    Agent { status: u32, index: u32 },

    /// The response names a different object than the one requested.
    #[error("requested {requested} but the agent answered for {received}")]
    UnexpectedReply { requested: String, received: String },

    // ── Addressing ──────────────────────────────────────────────────
    /// Host is neither an IP literal nor resolvable to an IPv4 address.
    #[error("invalid address: {host}")]
    InvalidAddress { host: String },

    /// Dotted object identifier could not be parsed.
    #[error("invalid object identifier '{oid}': {reason}")]
    InvalidOid { oid: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A value cannot be encoded for a SET request.
    #[error("value for {identifier} cannot be sent: {reason}")]
    UnsupportedValue { identifier: String, reason: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Io(_) | Self::UnexpectedReply { .. }
        )
    }

    /// Returns `true` if the failure means nothing reached the agent.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io(_) | Self::Snmp(_))
    }
}
