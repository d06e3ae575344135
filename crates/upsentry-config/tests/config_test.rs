#![allow(clippy::unwrap_used)]
// Profile loading, env overrides, community resolution, and translation
// to `DeviceConfig`.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use upsentry_api::SnmpVersion;
use upsentry_config::{
    Config, ConfigError, Defaults, Profile, load_config_from, profile_to_device_config,
    resolve_community, save_config_to,
};
use upsentry_core::{ProvisioningIdentifiers, Vendor};

const SAMPLE: &str = r#"
default_profile = "rack"

[defaults]
timeout_ms = 2000

[profiles.rack]
address = "10.0.0.21"
vendor = "tripp-lite"
community = "ups-ro"
snmp_version = "v2c"
port = 1161

[profiles.rack.provisioning]
apply = ".1.3.6.1.4.1.850.9.9.0"
"#;

// ── Loading ─────────────────────────────────────────────────────────
// Every test that reads the environment runs inside a `Jail` so env
// overrides set by one test never leak into another.

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let config = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;

        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout_ms, 1000);
        assert_eq!(config.defaults.poll_interval_ms, 1000);
        assert_eq!(config.defaults.port, 161);
        assert!(config.profiles.is_empty());
        Ok(())
    });
}

#[test]
fn file_values_override_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;

        let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

        assert_eq!(config.active_profile_name(None), "rack");
        assert_eq!(config.active_profile_name(Some("lab")), "lab");
        assert_eq!(config.defaults.timeout_ms, 2000);
        assert_eq!(config.defaults.output, "table");
        let rack = &config.profiles["rack"];
        assert_eq!(rack.vendor, Vendor::TrippLite);
        assert_eq!(rack.snmp_version, Some(SnmpVersion::V2c));
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        jail.set_env("UPSENTRY_DEFAULTS__TIMEOUT_MS", "2500");

        let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
        assert_eq!(config.defaults.timeout_ms, 2500);
        Ok(())
    });
}

#[test]
fn malformed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[profiles.rack]\nport = \"not a number\"\n")?;

        assert!(matches!(
            load_config_from(Path::new("config.toml")),
            Err(ConfigError::Figment(_))
        ));
        Ok(())
    });
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.profiles.insert(
        "default".into(),
        Profile {
            address: "ups.lab".into(),
            ..Profile::default()
        },
    );
    save_config_to(&config, &path).unwrap();

    Jail::expect_with(|_jail| {
        let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
        assert_eq!(loaded.profiles["default"].address, "ups.lab");
        assert_eq!(loaded.profiles["default"].vendor, Vendor::Astrodyne);
        Ok(())
    });
}

// ── Community resolution ────────────────────────────────────────────

#[test]
fn community_env_wins_over_plaintext() {
    Jail::expect_with(|jail| {
        jail.set_env("UPS_RACK_COMMUNITY", "from-env");
        let profile = Profile {
            address: "10.0.0.21".into(),
            community: Some("plaintext".into()),
            community_env: Some("UPS_RACK_COMMUNITY".into()),
            ..Profile::default()
        };

        let community = resolve_community(&profile, "upsentry-test-env");
        assert_eq!(community.expose_secret(), "from-env");
        Ok(())
    });
}

#[test]
fn plaintext_used_when_env_unset() {
    let profile = Profile {
        address: "10.0.0.21".into(),
        community: Some("plaintext".into()),
        community_env: Some("UPSENTRY_TEST_SURELY_UNSET_VAR".into()),
        ..Profile::default()
    };

    let community = resolve_community(&profile, "upsentry-test-plaintext");
    assert_eq!(community.expose_secret(), "plaintext");
}

#[test]
fn falls_back_to_public() {
    let profile = Profile {
        address: "10.0.0.21".into(),
        ..Profile::default()
    };

    let community = resolve_community(&profile, "upsentry-test-default");
    assert_eq!(community.expose_secret(), "public");
}

// ── Translation ─────────────────────────────────────────────────────

#[test]
fn profile_translates_with_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", SAMPLE)?;
        let config = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;

        let device = profile_to_device_config(&config.profiles["rack"], "rack", &config.defaults)
            .map_err(|e| e.to_string())?;

        assert_eq!(device.host, "10.0.0.21");
        assert_eq!(device.vendor, Vendor::TrippLite);
        assert_eq!(device.transport.version, SnmpVersion::V2c);
        assert_eq!(device.transport.port, 1161);
        assert_eq!(device.transport.timeout, Duration::from_millis(2000));
        assert_eq!(device.poll_interval, Duration::from_millis(1000));
        assert_eq!(device.community.expose_secret(), "ups-ro");
        assert_eq!(device.provisioning.apply.to_string(), ".1.3.6.1.4.1.850.9.9.0");
        assert_eq!(
            device.provisioning.ipv4_address,
            ProvisioningIdentifiers::default().ipv4_address
        );
        Ok(())
    });
}

#[test]
fn empty_address_is_rejected() {
    let result = profile_to_device_config(&Profile::default(), "empty", &Defaults::default());
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "address"
    ));
}

#[test]
fn zero_poll_interval_is_rejected() {
    let profile = Profile {
        address: "10.0.0.21".into(),
        poll_interval_ms: Some(0),
        ..Profile::default()
    };
    let result = profile_to_device_config(&profile, "fast", &Defaults::default());
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "poll_interval_ms"
    ));
}
