use crate::config::InstallerConfig;
use crate::manifest::ReleaseVariant;
use crate::platform::HostPlatform;
use anyhow::Result;

pub fn show_info(cfg: &InstallerConfig) -> Result<()> {
    let meta = &cfg.manifest.meta;
    println!("{} {}", meta.name, meta.version);
    println!("{}", meta.description);
    println!("homepage: {}", meta.homepage);
    for v in cfg.manifest.variants() {
        println!("  {:<13} {}", v.platform().key(), v.download_url);
        println!("  {:<13} sha256 {}", "", v.checksum);
    }
    Ok(())
}

pub fn show_resolved(cfg: &InstallerConfig, host: &HostPlatform, json: bool) -> Result<()> {
    let variant = cfg.manifest.resolve(&host.os, &host.arch)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&variant))?);
    } else {
        println!("platform: {}", variant.platform().key());
        println!("version:  {}", variant.version);
        println!("url:      {}", variant.download_url);
        println!("sha256:   {}", variant.checksum);
        println!("binary:   {}", variant.local_binary_name);
    }
    Ok(())
}

fn to_json(variant: &ReleaseVariant) -> serde_json::Value {
    serde_json::json!({
        "os": variant.os.to_string(),
        "arch": variant.arch.to_string(),
        "version": variant.version,
        "download_url": variant.download_url,
        "sha256": variant.checksum.to_hex(),
        "local_binary_name": variant.local_binary_name,
    })
}
