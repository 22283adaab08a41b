use crate::manifest::ReleaseVariant;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const RECEIPT_FILE: &str = ".rdm-receipt.toml";

/// Written next to the binary after a verified install.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Receipt {
    pub name: String,
    pub version: String,
    pub url: String,
    pub sha256: String,
    /// `darwin-arm64` style key
    pub platform: String,
    pub installed: DateTime<Utc>,
    #[serde(default)]
    pub installer_version: Option<String>,
}

impl Receipt {
    pub fn for_variant(variant: &ReleaseVariant) -> Self {
        Self {
            name: variant.local_binary_name.clone(),
            version: variant.version.clone(),
            url: variant.download_url.clone(),
            sha256: variant.checksum.to_hex(),
            platform: variant.platform().key(),
            installed: Utc::now(),
            installer_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(RECEIPT_FILE)
    }

    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let receipt = toml::from_str(&data)
            .with_context(|| format!("parsing install receipt {}", path.display()))?;
        Ok(Some(receipt))
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = Self::path_in(dir);
        let toml_str = toml::to_string_pretty(self).with_context(|| "serializing install receipt")?;
        fs::write(&path, toml_str)?;
        Ok(())
    }

    /// Removes the receipt; returns whether one existed.
    pub fn remove(dir: &Path) -> Result<bool> {
        let path = Self::path_in(dir);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}
