//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts, mut cfg: Config) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            redact(&mut cfg);
            let out = output::render_single(global.output, &cfg, to_toml, to_toml)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            let name = config::active_profile_name(global, &cfg);
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::ProfileExists { name });
            }

            let address = global.address.clone().ok_or_else(|| CliError::NoAddress {
                path: config::config_path().display().to_string(),
            })?;
            let profile = Profile {
                address,
                vendor: global.vendor.map(Into::into).unwrap_or_default(),
                community: global.community.clone(),
                snmp_version: global.snmp_version.map(Into::into),
                port: global.port,
                timeout_ms: global.timeout,
                ..Profile::default()
            };

            cfg.profiles.insert(name.clone(), profile);
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(name.clone());
            }
            let path = config::save_config(&cfg)?;

            tracing::info!(profile = %name, path = %path.display(), "profile saved");
            output::print_output(
                &format!("Saved profile '{name}' to {}", path.display()),
                global.quiet,
            );
            Ok(())
        }
    }
}

fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.community.is_some() {
            profile.community = Some(REDACTED.into());
        }
    }
}

/// TOML rendering for the table and plain views. A config that loaded
/// always serializes, so a failure here falls back to the error text.
fn to_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
