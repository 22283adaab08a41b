//! The release table for `rdm`: which asset to fetch for each supported
//! (os, arch) pair and the SHA-256 it must hash to.

use crate::error::{ManifestError, ResolveError};
use crate::platform::{Arch, HostPlatform, Os};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

pub const NAME: &str = "Remote Development Manager";
pub const DESCRIPTION: &str = "A tool for remote development environments";
pub const BASE_URL: &str = "https://github.com/BlakeWilliams/remote-development-manager";
pub const VERSION: &str = "0.0.6";
pub const BINARY: &str = "rdm";

// Checksums are only valid for VERSION. Bump them together.
const CHECKSUMS: [(&str, &str); 4] = [
    ("darwin-arm64", "c562d6040a2d84e60790f7de7a4bc7e4d9bdad390cc72cc0d402c7eb6e9553b2"),
    ("darwin-amd64", "617d002120fdfe227aed377a998334ddbfc418758a03b89baa9027ea9f976429"),
    ("linux-arm64", "fb42eacfe2ec272d66660569524ad4b732311727f31cb72d9ef8ea36bb852941"),
    ("linux-amd64", "9b79290ef87e0e0f37e71cf9a76ef1a4377472c56907fd01241f9881ecc57d36"),
];

static BUILTIN: Lazy<Manifest> = Lazy::new(|| {
    let checksums = CHECKSUMS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    Manifest::new(
        ManifestMeta {
            name: NAME.to_string(),
            description: DESCRIPTION.to_string(),
            homepage: BASE_URL.to_string(),
            version: VERSION.to_string(),
            base_url: BASE_URL.to_string(),
            binary: BINARY.to_string(),
        },
        checksums,
    )
    .expect("built-in release table is valid")
});

/// Every (os, arch) pair a release is published for.
pub fn supported_platforms() -> [HostPlatform; 4] {
    [
        HostPlatform::new(Os::Macos, Arch::Arm64),
        HostPlatform::new(Os::Macos, Arch::X86_64),
        HostPlatform::new(Os::Linux, Arch::Arm64),
        HostPlatform::new(Os::Linux, Arch::X86_64),
    ]
}

/// A 256-bit SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Parses exactly 64 hex characters (either case).
    pub fn parse(hex_str: &str) -> Option<Self> {
        if hex_str.len() != 64 {
            return None;
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut out).ok()?;
        Some(Self(out))
    }

    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 32]> for Sha256Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One platform-specific build artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVariant {
    pub os: Os,
    pub arch: Arch,
    pub version: String,
    pub download_url: String,
    pub checksum: Sha256Digest,
    pub local_binary_name: String,
}

impl ReleaseVariant {
    pub fn platform(&self) -> HostPlatform {
        HostPlatform::new(self.os.clone(), self.arch.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMeta {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub version: String,
    pub base_url: String,
    pub binary: String,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub meta: ManifestMeta,
    checksums: HashMap<HostPlatform, Sha256Digest>,
}

impl Manifest {
    /// Validates a release table. `checksums` is keyed by `darwin-arm64` style
    /// platform keys and must cover every supported platform.
    pub fn new(
        mut meta: ManifestMeta,
        checksums: HashMap<String, String>,
    ) -> Result<Self, ManifestError> {
        meta.version = clean_version(&meta.version);
        if semver::Version::parse(&meta.version).is_err() {
            return Err(ManifestError::InvalidVersion(meta.version));
        }
        meta.base_url = meta.base_url.trim_end_matches('/').to_string();

        let supported = supported_platforms();
        let mut table = HashMap::with_capacity(supported.len());
        for (key, value) in &checksums {
            let platform = HostPlatform::parse_key(key)
                .filter(|p| supported.contains(p))
                .ok_or_else(|| ManifestError::UnknownPlatformKey(key.clone()))?;
            let digest =
                Sha256Digest::parse(value.trim()).ok_or_else(|| ManifestError::InvalidChecksum {
                    platform: key.clone(),
                    value: value.clone(),
                })?;
            if table.insert(platform, digest).is_some() {
                return Err(ManifestError::DuplicateVariant(key.clone()));
            }
        }
        if let Some(missing) = supported.iter().find(|p| !table.contains_key(*p)) {
            return Err(ManifestError::MissingVariant(missing.key()));
        }
        Ok(Self {
            meta,
            checksums: table,
        })
    }

    pub fn builtin() -> &'static Manifest {
        &BUILTIN
    }

    pub fn version(&self) -> &str {
        &self.meta.version
    }

    pub fn checksum(&self, platform: &HostPlatform) -> Option<Sha256Digest> {
        self.checksums.get(platform).copied()
    }

    /// Resolve against this manifest's own version.
    pub fn resolve(&self, os: &Os, arch: &Arch) -> Result<ReleaseVariant, ResolveError> {
        self.resolve_version(os, arch, &self.meta.version)
    }

    pub fn resolve_version(
        &self,
        os: &Os,
        arch: &Arch,
        version: &str,
    ) -> Result<ReleaseVariant, ResolveError> {
        let platform = HostPlatform::new(os.clone(), arch.clone());
        let Some(checksum) = self.checksum(&platform) else {
            return Err(ResolveError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            });
        };
        let version = clean_version(version);
        Ok(ReleaseVariant {
            download_url: self.download_url(&platform, &version),
            os: platform.os,
            arch: platform.arch,
            version,
            checksum,
            local_binary_name: self.meta.binary.clone(),
        })
    }

    /// All variants, in a stable order.
    pub fn variants(&self) -> Vec<ReleaseVariant> {
        supported_platforms()
            .iter()
            .filter_map(|p| self.resolve(&p.os, &p.arch).ok())
            .collect()
    }

    /// Platform keys mapped to hex checksums, the shape manifest files use.
    pub fn checksum_table(&self) -> HashMap<String, String> {
        self.checksums
            .iter()
            .map(|(p, d)| (p.key(), d.to_hex()))
            .collect()
    }

    fn download_url(&self, platform: &HostPlatform, version: &str) -> String {
        format!(
            "{base}/releases/download/v{version}/{bin}-{os}-{arch}",
            base = self.meta.base_url,
            bin = self.meta.binary,
            os = platform.os,
            arch = platform.arch,
        )
    }
}

/// Resolve against the built-in release table.
pub fn resolve(os: &Os, arch: &Arch, version: &str) -> Result<ReleaseVariant, ResolveError> {
    Manifest::builtin().resolve_version(os, arch, version)
}

fn clean_version(version: &str) -> String {
    let version = version.trim();
    version.strip_prefix('v').unwrap_or(version).to_string()
}
