//! Configuration for the upsentry CLI.
//!
//! TOML profiles, community resolution (env + keyring + plaintext), and
//! translation to `upsentry_core::DeviceConfig`. The CLI layers its
//! command-line overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use upsentry_api::{ObjectId, SnmpVersion, TransportConfig};
use upsentry_core::{DEFAULT_COMMUNITY, DeviceConfig, ProvisioningIdentifiers, Vendor};

const KEYRING_SERVICE: &str = "upsentry";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use: explicit choice, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// `information`, `debug`, or `verbose`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub snmp_version: SnmpVersion,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: default_log_level(),
            snmp_version: SnmpVersion::default(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_log_level() -> String {
    "information".into()
}
fn default_port() -> u16 {
    upsentry_api::DEFAULT_PORT
}
fn default_timeout_ms() -> u64 {
    1000
}
fn default_poll_interval_ms() -> u64 {
    1000
}

/// A named device profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Host name or IP literal of the UPS network card.
    pub address: String,

    #[serde(default)]
    pub vendor: Vendor,

    /// Community string (plaintext; prefer keyring or env var).
    pub community: Option<String>,

    /// Environment variable name containing the community string.
    pub community_env: Option<String>,

    pub snmp_version: Option<SnmpVersion>,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,

    /// Firmware-specific provisioning identifiers.
    #[serde(default)]
    pub provisioning: ProvisioningOverrides,
}

/// Per-profile replacements for the built-in provisioning identifiers.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvisioningOverrides {
    pub ipv4_dhcp_enabled: Option<ObjectId>,
    pub ipv4_address: Option<ObjectId>,
    pub auto_restart: Option<ObjectId>,
    pub apply: Option<ObjectId>,
}

impl ProvisioningOverrides {
    pub fn apply_to(&self, base: ProvisioningIdentifiers) -> ProvisioningIdentifiers {
        ProvisioningIdentifiers {
            ipv4_dhcp_enabled: self.ipv4_dhcp_enabled.clone().unwrap_or(base.ipv4_dhcp_enabled),
            ipv4_address: self.ipv4_address.clone().unwrap_or(base.ipv4_address),
            auto_restart: self.auto_restart.clone().unwrap_or(base.auto_restart),
            apply: self.apply.clone().unwrap_or(base.apply),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "upsentry", "upsentry").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("upsentry");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment keys use `__` for nesting, e.g.
/// `UPSENTRY_DEFAULTS__TIMEOUT_MS=2500`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("UPSENTRY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Community resolution ────────────────────────────────────────────

/// Resolve the SNMP community for a profile.
///
/// Order: `community_env` variable, system keyring, plaintext, then the
/// well-known default.
pub fn resolve_community(profile: &Profile, profile_name: &str) -> SecretString {
    if let Some(ref env_name) = profile.community_env {
        if let Ok(val) = std::env::var(env_name) {
            debug!(profile = profile_name, "community from environment");
            return SecretString::from(val);
        }
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/community")) {
        if let Ok(secret) = entry.get_password() {
            debug!(profile = profile_name, "community from keyring");
            return SecretString::from(secret);
        }
    }

    if let Some(ref community) = profile.community {
        return SecretString::from(community.clone());
    }

    SecretString::from(DEFAULT_COMMUNITY.to_owned())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DeviceConfig` from a profile and the global defaults.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DeviceConfig, ConfigError> {
    let host = profile.address.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: format!("profile '{profile_name}' has no address"),
        });
    }

    let timeout_ms = positive("timeout_ms", profile.timeout_ms.unwrap_or(defaults.timeout_ms))?;
    let poll_interval_ms = positive(
        "poll_interval_ms",
        profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
    )?;

    Ok(DeviceConfig {
        host: host.to_owned(),
        vendor: profile.vendor,
        community: resolve_community(profile, profile_name),
        transport: TransportConfig {
            version: profile.snmp_version.unwrap_or(defaults.snmp_version),
            timeout: Duration::from_millis(timeout_ms),
            port: profile.port.unwrap_or(defaults.port),
        },
        poll_interval: Duration::from_millis(poll_interval_ms),
        provisioning: profile
            .provisioning
            .apply_to(ProvisioningIdentifiers::default()),
    })
}

/// Reject zero durations.
pub fn positive(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}
