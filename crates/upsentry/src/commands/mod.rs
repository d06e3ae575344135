//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod info;
pub mod stats;
pub mod write;

use upsentry_core::DeviceConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    device: &DeviceConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Info => info::handle(device, global).await,
        Command::Stats(args) => stats::handle(device, args, global).await,
        Command::Write(args) => write::handle(device, args, global).await,
        // Config is handled before dispatch
        Command::Config(_) => unreachable!(),
    }
}
