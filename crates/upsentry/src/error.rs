//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use upsentry_config::ConfigError;
use upsentry_core::{CoreError, WriteError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const WRITE: i32 = 6;
    pub const ADDRESS: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Addressing ───────────────────────────────────────────────────

    #[error("Could not resolve '{host}' to an IP address")]
    #[diagnostic(
        code(upsentry::address_resolution),
        help("Check the host name, or pass an IP literal with --address.")
    )]
    AddressResolution { host: String },

    #[error("No UPS address configured")]
    #[diagnostic(
        code(upsentry::no_address),
        help(
            "Pass --address, set UPSENTRY_ADDRESS, or create a profile:\n\
             upsentry --address <host> config init\n\
             Config file: {path}"
        )
    )]
    NoAddress { path: String },

    // ── Device communication ─────────────────────────────────────────

    #[error("UPS did not answer within {timeout_ms}ms")]
    #[diagnostic(
        code(upsentry::timeout),
        help("Check the community string and SNMP version, or raise --timeout.")
    )]
    Timeout { timeout_ms: u64 },

    #[error("SNMP request failed: {message}")]
    #[diagnostic(code(upsentry::snmp))]
    Snmp { message: String },

    #[error("Unexpected value from device: {message}")]
    #[diagnostic(
        code(upsentry::decode),
        help("The selected --vendor may not match this device.")
    )]
    Decode { message: String },

    // ── Write ────────────────────────────────────────────────────────

    #[error("{source}")]
    #[diagnostic(code(upsentry::write_failed), help("{hint}"))]
    Write {
        #[source]
        source: WriteError,
        hint: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(upsentry::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(upsentry::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: upsentry --profile {name} --address <host> config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Profile '{name}' already exists")]
    #[diagnostic(
        code(upsentry::profile_exists),
        help("Use --force to replace it.")
    )]
    ProfileExists { name: String },

    #[error(transparent)]
    #[diagnostic(code(upsentry::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {reason}")]
    #[diagnostic(code(upsentry::render))]
    Render { reason: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AddressResolution { .. } => exit_code::ADDRESS,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Write { .. } => exit_code::WRITE,
            Self::NoAddress { .. }
            | Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::ProfileExists { .. } => exit_code::USAGE,
            Self::Config(inner) => match **inner {
                ConfigError::Validation { .. } => exit_code::USAGE,
                _ => exit_code::GENERAL,
            },
            Self::Snmp { .. } | Self::Decode { .. } | Self::Io(_) | Self::Render { .. } => {
                exit_code::GENERAL
            }
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<WriteError> for CliError {
    fn from(err: WriteError) -> Self {
        let hint = match &err {
            WriteError::NotApplied { .. } => {
                "Nothing was changed. Check connectivity and the write community."
            }
            WriteError::BatchRejected { .. } => {
                "Nothing was staged. The device may not support this identifier; \
                 override it under [profiles.<name>.provisioning]."
            }
            WriteError::NotCommitted { .. } => {
                "Settings are staged but not active. Re-run the write or apply them \
                 from the device's own interface."
            }
        };
        Self::Write {
            source: err,
            hint: hint.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AddressResolution { host } => CliError::AddressResolution { host },
            CoreError::Timeout { timeout_ms } => CliError::Timeout { timeout_ms },
            CoreError::Fetch { source } => CliError::Snmp {
                message: source.to_string(),
            },
            CoreError::Decode(e) => CliError::Decode {
                message: e.to_string(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
