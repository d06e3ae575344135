//! Clap derive structures for the `upsentry` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use upsentry_api::SnmpVersion;
use upsentry_core::Vendor;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// upsentry -- watch and provision UPS network cards over SNMP
#[derive(Debug, Parser)]
#[command(
    name = "upsentry",
    version,
    about = "Monitor and provision UPS network cards over SNMP",
    long_about = "Polls UPS-MIB (RFC 1628) telemetry from a UPS network card,\n\
        logs battery and output changes, and pushes static IPv4 settings.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "UPSENTRY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// UPS host name or IP address (overrides profile)
    #[arg(long, short = 'a', env = "UPSENTRY_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Device family
    #[arg(long, env = "UPSENTRY_VENDOR", global = true)]
    pub vendor: Option<VendorArg>,

    /// SNMP community string
    #[arg(long, env = "UPSENTRY_COMMUNITY", global = true, hide_env_values = true)]
    pub community: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, short = 't', env = "UPSENTRY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// SNMP protocol version
    #[arg(long, env = "UPSENTRY_SNMP_VERSION", global = true)]
    pub snmp_version: Option<SnmpVersionArg>,

    /// Agent UDP port
    #[arg(long, env = "UPSENTRY_PORT", global = true)]
    pub port: Option<u16>,

    /// Log verbosity (RUST_LOG overrides)
    #[arg(long, short = 'l', env = "UPSENTRY_LOG_LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Also write logs to this file, rotated daily
    #[arg(long, env = "UPSENTRY_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UPSENTRY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum VendorArg {
    Astrodyne,
    TrippLite,
}

impl From<VendorArg> for Vendor {
    fn from(arg: VendorArg) -> Self {
        match arg {
            VendorArg::Astrodyne => Vendor::Astrodyne,
            VendorArg::TrippLite => Vendor::TrippLite,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SnmpVersionArg {
    V1,
    V2c,
}

impl From<SnmpVersionArg> for SnmpVersion {
    fn from(arg: SnmpVersionArg) -> Self {
        match arg {
            SnmpVersionArg::V1 => SnmpVersion::V1,
            SnmpVersionArg::V2c => SnmpVersion::V2c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Changes, failures, and write results
    Information,
    /// Adds transport and decoding detail
    Debug,
    /// Every poll, including unchanged ones
    Verbose,
}

impl LogLevel {
    pub fn filter(self) -> &'static str {
        match self {
            Self::Information => "info",
            Self::Debug => "debug",
            Self::Verbose => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show manufacturer and network settings
    Info,

    /// Poll telemetry until interrupted, reporting changes
    #[command(alias = "watch")]
    Stats(StatsArgs),

    /// Push a static IPv4 configuration and commit it
    Write(WriteArgs),

    /// Inspect or initialize the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, Args)]
pub struct StatsArgs {
    /// Poll period in milliseconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Stop after this many completed polls
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Address to assign; defaults to the target address
    #[arg(long)]
    pub new_address: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Print the effective configuration (secrets redacted)
    Show,

    /// Create or replace a profile from --address / --vendor / --community
    Init {
        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },
}
