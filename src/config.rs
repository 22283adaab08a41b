use crate::error::ManifestError;
use crate::manifest::{self, Manifest, ManifestMeta};
use crate::platform::platform;
use anyhow::{anyhow, Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Everything an install run needs: the release table and how to fetch it.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub manifest: Manifest,
    pub settings: InstallSettings,
}

/// On-disk form of a release table. Only `version` and `sha256` are required;
/// the rest fall back to the built-in values.
///
/// ```toml
/// version = "0.0.6"
///
/// [sha256]
/// darwin-arm64 = "c562..."
/// darwin-amd64 = "617d..."
/// linux-arm64 = "fb42..."
/// linux-amd64 = "9b79..."
///
/// [install]
/// dir = "/usr/local/bin"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    pub version: String,
    /// Repository URL; assets live under `<base_url>/releases/download/`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub binary: Option<String>,
    pub sha256: HashMap<String, String>,
    #[serde(default)]
    pub install: InstallSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            dir: None,
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    120
}

impl ManifestFile {
    pub fn parse(src: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(src)?)
    }

    pub fn into_config(self) -> Result<InstallerConfig, ManifestError> {
        let builtin = &Manifest::builtin().meta;
        let base_url = self.base_url.unwrap_or_else(|| builtin.base_url.clone());
        let meta = ManifestMeta {
            name: self.name.unwrap_or_else(|| builtin.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| builtin.description.clone()),
            homepage: self.homepage.unwrap_or_else(|| base_url.clone()),
            version: self.version,
            base_url,
            binary: self.binary.unwrap_or_else(|| manifest::BINARY.to_string()),
        };
        Ok(InstallerConfig {
            manifest: Manifest::new(meta, self.sha256)?,
            settings: self.install,
        })
    }

    /// The file form of an already-validated manifest.
    pub fn from_manifest(manifest: &Manifest, settings: &InstallSettings) -> Self {
        let meta = &manifest.meta;
        Self {
            name: Some(meta.name.clone()),
            description: Some(meta.description.clone()),
            homepage: Some(meta.homepage.clone()),
            version: meta.version.clone(),
            base_url: Some(meta.base_url.clone()),
            binary: Some(meta.binary.clone()),
            sha256: manifest.checksum_table(),
            install: settings.clone(),
        }
    }
}

impl InstallerConfig {
    pub fn builtin() -> Self {
        Self {
            manifest: Manifest::builtin().clone(),
            settings: InstallSettings::default(),
        }
    }

    /// Load from `path`, or use the built-in table when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("using built-in release table v{}", manifest::VERSION);
            return Ok(Self::builtin());
        };
        let data = fs::read_to_string(path)?;
        let file = ManifestFile::parse(&data)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        let cfg = file
            .into_config()
            .with_context(|| format!("validating manifest {}", path.display()))?;
        tracing::debug!(
            "loaded release table v{} from {}",
            cfg.manifest.version(),
            path.display()
        );
        Ok(cfg)
    }

    /// `--dir` beats the manifest's `[install] dir`, which beats the platform default.
    pub fn install_dir(&self, cli_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.settings.dir {
            return Ok(dir.clone());
        }
        platform()
            .default_bin_dir()
            .ok_or_else(|| anyhow!("cannot determine home directory; pass --dir"))
    }
}
