//! Integration tests for the `upsentry` CLI binary.
//!
//! These tests cover argument parsing, help output, config handling, and
//! the error paths that fail before any SNMP traffic is sent.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `upsentry` binary with env isolation.
///
/// Clears all `UPSENTRY_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn upsentry_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("upsentry");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("UPSENTRY_PROFILE")
        .env_remove("UPSENTRY_ADDRESS")
        .env_remove("UPSENTRY_VENDOR")
        .env_remove("UPSENTRY_COMMUNITY")
        .env_remove("UPSENTRY_TIMEOUT")
        .env_remove("UPSENTRY_SNMP_VERSION")
        .env_remove("UPSENTRY_PORT")
        .env_remove("UPSENTRY_LOG_LEVEL")
        .env_remove("UPSENTRY_LOG_FILE")
        .env_remove("UPSENTRY_OUTPUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = upsentry_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("UPS")
                .and(predicate::str::contains("info"))
                .and(predicate::str::contains("stats"))
                .and(predicate::str::contains("write")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("upsentry"));
}

#[test]
fn test_unknown_vendor_rejected() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--vendor", "acme", "info"])
        .assert()
        .code(2);
}

// ── Error paths before any traffic ──────────────────────────────────

#[test]
fn test_info_without_address() {
    let home = tempfile::tempdir().unwrap();
    let output = upsentry_cmd(home.path()).arg("info").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("No UPS address configured"),
        "Expected missing-address error:\n{text}"
    );
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--profile", "nope", "info"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_unresolvable_address() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--address", "bad host.invalid", "info"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("bad host.invalid"));
}

#[test]
fn test_zero_timeout_rejected() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--address", "192.0.2.1", "--timeout", "0", "info"])
        .assert()
        .code(2);
}

#[test]
fn test_zero_interval_rejected() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--address", "192.0.2.1", "stats", "--interval", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_write_rejects_ipv6_target() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--address", "192.0.2.1", "write", "--new-address", "fe80::1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IPv4"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args([
            "--address",
            "10.0.0.9",
            "--vendor",
            "tripp-lite",
            "--community",
            "private",
            "config",
            "init",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved profile 'default'"));

    upsentry_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.0.0.9")
                .and(predicate::str::contains("tripp-lite"))
                .and(predicate::str::contains("private").not()),
        );
}

#[test]
fn test_config_init_refuses_existing_profile() {
    let home = tempfile::tempdir().unwrap();
    upsentry_cmd(home.path())
        .args(["--address", "10.0.0.9", "config", "init"])
        .assert()
        .success();

    upsentry_cmd(home.path())
        .args(["--address", "10.0.0.10", "config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    upsentry_cmd(home.path())
        .args(["--address", "10.0.0.10", "config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_malformed_config_file() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("upsentry");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "profiles = [").unwrap();

    upsentry_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .code(1);
}
