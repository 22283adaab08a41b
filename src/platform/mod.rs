//! Host introspection: which OS family and CPU architecture we are running on,
//! plus the handful of filesystem operations that differ between them.

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

pub fn platform() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

pub trait PlatformOps: Sync + Send {
    fn home_dir(&self) -> Option<PathBuf>;
    /// Directory used when the caller does not pass `--dir`.
    fn default_bin_dir(&self) -> Option<PathBuf>;
    fn final_binary_name(&self, base: &str) -> String;
    fn make_executable(&self, path: &Path) -> Result<()>;
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;

/// Operating system family. Only `Macos` and `Linux` have release assets,
/// the rest exist so an unsupported host can be reported as what it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    Macos,
    Linux,
    Windows,
    Other(String),
}

impl Os {
    pub fn from_host() -> Self {
        Self::parse(std::env::consts::OS)
    }

    /// Accepts Rust's `consts::OS` values as well as release-asset spellings.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" | "osx" => Os::Macos,
            "linux" => Os::Linux,
            "windows" | "win" => Os::Windows,
            other => Os::Other(other.to_string()),
        }
    }

    /// Token used in release asset names.
    pub fn asset_token(&self) -> &str {
        match self {
            Os::Macos => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::Other(s) => s,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    Arm64,
    X86_64,
    Other(String),
}

impl Arch {
    pub fn from_host() -> Self {
        Self::parse(std::env::consts::ARCH)
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "arm64" | "aarch64" => Arch::Arm64,
            "amd64" | "x86_64" | "x64" | "x86-64" => Arch::X86_64,
            other => Arch::Other(other.to_string()),
        }
    }

    pub fn asset_token(&self) -> &str {
        match self {
            Arch::Arm64 => "arm64",
            Arch::X86_64 => "amd64",
            Arch::Other(s) => s,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_token())
    }
}

/// The (os, arch) pair a release variant is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPlatform {
    pub os: Os,
    pub arch: Arch,
}

impl HostPlatform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    pub fn detect() -> Self {
        Self::new(Os::from_host(), Arch::from_host())
    }

    /// Detected host with optional user overrides applied per axis.
    pub fn detect_with(os: Option<Os>, arch: Option<Arch>) -> Self {
        Self::new(
            os.unwrap_or_else(Os::from_host),
            arch.unwrap_or_else(Arch::from_host),
        )
    }

    /// `darwin-arm64` style key, as used in asset names and manifest files.
    pub fn key(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    pub fn parse_key(key: &str) -> Option<Self> {
        let (os, arch) = key.split_once('-')?;
        Some(Self::new(Os::parse(os), Arch::parse(arch)))
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
