use crate::config::InstallerConfig;
use crate::installer;
use anyhow::Result;
use std::path::Path;

pub fn uninstall(cfg: &InstallerConfig, dir: Option<&Path>) -> Result<()> {
    let dest = cfg.install_dir(dir)?;
    let binary = &cfg.manifest.meta.binary;
    if installer::uninstall(binary, &dest)? {
        println!("Uninstalled {binary} from {}", dest.display());
    } else {
        println!("{binary} is not installed in {} (nothing to do)", dest.display());
    }
    Ok(())
}
