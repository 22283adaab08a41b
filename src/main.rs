use anyhow::Result;
use clap::Parser;

use rdm_install::cli::Cli;
use rdm_install::command_handlers;
use rdm_install::config::InstallerConfig;
use rdm_install::logging::init_logging;
use rdm_install::platform::HostPlatform;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cfg = InstallerConfig::load(cli.manifest.as_deref())?;
    let host = HostPlatform::detect_with(cli.os, cli.arch);
    tracing::debug!("host platform {host}");
    command_handlers::dispatch::dispatch(cli.command, &cfg, &host)?;
    Ok(())
}
