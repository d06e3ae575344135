//! CLI configuration, a thin wrapper around `upsentry_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--address,
//! --community, --timeout, ...). Flags beat the profile, the profile
//! beats `[defaults]`.

use std::time::Duration;

use secrecy::SecretString;

use upsentry_core::DeviceConfig;

use crate::cli::{GlobalOpts, LogLevel};
use crate::error::CliError;

pub use upsentry_config::{Config, Profile, config_path, load_config, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Log level: flag, then `[defaults] log_level`, then information.
pub fn log_level(global: &GlobalOpts, config: &Config) -> LogLevel {
    global.log_level.unwrap_or(match config.defaults.log_level.as_str() {
        "verbose" => LogLevel::Verbose,
        "debug" => LogLevel::Debug,
        _ => LogLevel::Information,
    })
}

/// Build the `DeviceConfig` for the active profile plus flag overrides.
///
/// Without a matching profile the device is described by flags alone,
/// which requires `--address`. Naming a profile explicitly that does not
/// exist is an error.
pub fn resolve_device(global: &GlobalOpts, config: &Config) -> Result<DeviceConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let profile = if let Some(profile) = config.profiles.get(&profile_name) {
        let mut profile = profile.clone();
        if let Some(ref address) = global.address {
            profile.address.clone_from(address);
        }
        profile
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(config),
        });
    } else {
        let address = global.address.clone().ok_or_else(|| CliError::NoAddress {
            path: config_path().display().to_string(),
        })?;
        Profile {
            address,
            ..Profile::default()
        }
    };

    let mut device =
        upsentry_config::profile_to_device_config(&profile, &profile_name, &config.defaults)?;
    apply_overrides(&mut device, global)?;
    Ok(device)
}

fn apply_overrides(device: &mut DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(vendor) = global.vendor {
        device.vendor = vendor.into();
    }
    if let Some(ref community) = global.community {
        device.community = SecretString::from(community.clone());
    }
    if let Some(timeout) = global.timeout {
        let timeout = upsentry_config::positive("timeout", timeout)?;
        device.transport.timeout = Duration::from_millis(timeout);
    }
    if let Some(version) = global.snmp_version {
        device.transport.version = version.into();
    }
    if let Some(port) = global.port {
        device.transport.port = port;
    }
    Ok(())
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    let mut names: Vec<_> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join(", ")
}
