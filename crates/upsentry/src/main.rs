mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, LogLevel};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = start(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Load config, install logging, run the command. The log guard lives
/// until this returns so buffered file output is flushed before exit.
async fn start(cli: Cli) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let level = config::log_level(&cli.global, &cfg);
    let _guard = init_tracing(level, cli.global.log_file.as_deref())?;

    run(cli, cfg).await
}

fn init_tracing(level: LogLevel, log_file: Option<&Path>) -> Result<Option<WorkerGuard>, CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter()));

    let stderr = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| CliError::Validation {
                field: "log-file".into(),
                reason: format!("'{}' does not name a file", path.display()),
            })?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run(cli: Cli, cfg: config::Config) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, cfg),

        cmd => {
            let device = config::resolve_device(&cli.global, &cfg)?;
            tracing::debug!(command = ?cmd, host = %device.host, vendor = %device.vendor, "dispatching command");
            commands::dispatch(cmd, &device, &cli.global).await
        }
    }
}
