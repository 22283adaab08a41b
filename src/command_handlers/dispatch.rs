use crate::cli::Commands;
use crate::command_handlers::{info, install, uninstall, verify};
use crate::config::InstallerConfig;
use crate::platform::HostPlatform;
use anyhow::Result;

pub fn dispatch(cmd: Commands, cfg: &InstallerConfig, host: &HostPlatform) -> Result<()> {
    match cmd {
        Commands::Info => info::show_info(cfg),
        Commands::Resolve { json } => info::show_resolved(cfg, host, json),
        Commands::Install { dir, force } => {
            let args = install::InstallArgs {
                dir: dir.as_deref(),
                force,
                cfg,
                host,
            };
            install::run_install(args)
        }
        Commands::Verify { dir } => verify::verify_installed(cfg, host, dir.as_deref()),
        Commands::Status { dir } => verify::show_status(cfg, host, dir.as_deref()),
        Commands::Uninstall { dir } => uninstall::uninstall(cfg, dir.as_deref()),
    }
}
