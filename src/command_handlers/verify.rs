use crate::config::InstallerConfig;
use crate::error::InstallError;
use crate::installer;
use crate::platform::HostPlatform;
use crate::receipt::Receipt;
use anyhow::{bail, Result};
use std::path::Path;

pub fn verify_installed(cfg: &InstallerConfig, host: &HostPlatform, dir: Option<&Path>) -> Result<()> {
    let variant = cfg.manifest.resolve(&host.os, &host.arch)?;
    let dest = cfg.install_dir(dir)?;
    let bin = installer::binary_path(&variant.local_binary_name, &dest);
    if !bin.exists() {
        bail!("{} is not installed (run 'rdm-install install')", bin.display());
    }
    let actual = installer::digest_file(&bin)?;
    if actual != variant.checksum {
        return Err(InstallError::ChecksumMismatch {
            location: bin.display().to_string(),
            expected: variant.checksum.to_hex(),
            actual: actual.to_hex(),
        }
        .into());
    }
    println!("{} OK (sha256 {actual})", bin.display());
    Ok(())
}

pub fn show_status(cfg: &InstallerConfig, host: &HostPlatform, dir: Option<&Path>) -> Result<()> {
    let dest = cfg.install_dir(dir)?;
    let wanted = cfg.manifest.version();
    let Some(receipt) = Receipt::load(&dest)? else {
        println!("rdm not installed in {} (available: {wanted})", dest.display());
        return Ok(());
    };
    println!(
        "{} {} ({}) installed {}",
        receipt.name,
        receipt.version,
        receipt.platform,
        receipt.installed.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  from {}", receipt.url);
    if receipt.platform != host.key() {
        println!("  note: installed for {}, this host is {}", receipt.platform, host.key());
    }
    let bin = installer::binary_path(&receipt.name, &dest);
    println!("  {}", freshness(&receipt, bin.exists(), wanted));
    Ok(())
}

fn freshness(receipt: &Receipt, binary_present: bool, wanted: &str) -> String {
    if !binary_present {
        return format!("receipt present, binary missing (run 'rdm-install install' for {wanted})");
    }
    match compare_versions(&receipt.version, wanted) {
        Some(std::cmp::Ordering::Less) => format!("update available: {} -> {wanted}", receipt.version),
        Some(std::cmp::Ordering::Greater) => format!("newer than release table ({wanted})"),
        Some(std::cmp::Ordering::Equal) => "up to date".to_string(),
        None => format!("cannot compare versions {} and {wanted}", receipt.version),
    }
}

fn compare_versions(installed: &str, wanted: &str) -> Option<std::cmp::Ordering> {
    let a = semver::Version::parse(installed).ok()?;
    let b = semver::Version::parse(wanted).ok()?;
    Some(a.cmp(&b))
}
