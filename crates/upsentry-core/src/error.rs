// ── Core error types ──
//
// Poll failures as consumers see them. Writes report through
// `WriteError`, which carries the identifier that failed. The
// `From<upsentry_api::Error>` impl folds transport errors into the
// variants the CLI maps to exit codes.

use thiserror::Error;

use crate::convert::DecodeError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Addressing ───────────────────────────────────────────────────
    #[error("Address '{host}' could not be resolved to an IP address")]
    AddressResolution { host: String },

    // ── Poll errors ──────────────────────────────────────────────────
    #[error("Device did not answer within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Telemetry fetch failed: {source}")]
    Fetch {
        #[source]
        source: upsentry_api::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the next poll has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Fetch { source } => source.is_transient(),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<upsentry_api::Error> for CoreError {
    fn from(err: upsentry_api::Error) -> Self {
        match err {
            upsentry_api::Error::InvalidAddress { host } => CoreError::AddressResolution { host },
            upsentry_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            upsentry_api::Error::InvalidOid { oid, reason } => CoreError::Config {
                message: format!("invalid identifier '{oid}': {reason}"),
            },
            other => CoreError::Fetch { source: other },
        }
    }
}
