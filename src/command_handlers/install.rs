use crate::config::InstallerConfig;
use crate::installer::{self, HttpFetcher, InstallOutcome};
use crate::platform::HostPlatform;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub struct InstallArgs<'a> {
    pub dir: Option<&'a Path>,
    pub force: bool,
    pub cfg: &'a InstallerConfig,
    pub host: &'a HostPlatform,
}

pub fn run_install(args: InstallArgs) -> Result<()> {
    // Resolve before touching the network or the filesystem.
    let variant = args.cfg.manifest.resolve(&args.host.os, &args.host.arch)?;
    let dest = args.cfg.install_dir(args.dir)?;
    let fetcher = HttpFetcher::new(&args.cfg.settings)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!(
        "Installing {} {} ({})",
        variant.local_binary_name,
        variant.version,
        variant.platform().key()
    ));

    match installer::install(&fetcher, &variant, &dest, args.force, Some(&pb)) {
        Ok(InstallOutcome::Installed { path, bytes }) => {
            pb.finish_with_message(format!(
                "Installed {} {} to {} ({bytes} bytes, sha256 verified)",
                variant.local_binary_name,
                variant.version,
                path.display()
            ));
        }
        Ok(InstallOutcome::AlreadyInstalled { path }) => {
            pb.finish_with_message(format!(
                "{} {} already installed at {} (skip)",
                variant.local_binary_name,
                variant.version,
                path.display()
            ));
        }
        Err(e) => {
            pb.finish_with_message(format!("FAILED {}: {e}", variant.local_binary_name));
            return Err(e);
        }
    }
    if !on_path(&dest) {
        println!(
            "[rdm-install] {} is not on PATH. Add it with: export PATH=\"{}:$PATH\"",
            dest.display(),
            dest.display()
        );
    }
    Ok(())
}

fn on_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).any(|entry| entry == dir))
        .unwrap_or(false)
}
