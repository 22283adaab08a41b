use thiserror::Error;

/// The only way resolution can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no rdm release for platform {os}/{arch} (supported: darwin/linux on arm64/amd64)")]
    UnsupportedPlatform { os: String, arch: String },
}

#[derive(Debug, Error)]
pub enum InstallError {
    /// `location` is the download URL, or the file path when checking an installed binary.
    #[error("checksum mismatch for {location}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        location: String,
        expected: String,
        actual: String,
    },
    #[error("download of {url} failed: {reason}")]
    DownloadFailure { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("parsing manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("version '{0}' is not a semantic version")]
    InvalidVersion(String),
    #[error("checksum for {platform} must be 64 hex characters, got '{value}'")]
    InvalidChecksum { platform: String, value: String },
    #[error("manifest has no checksum for {0}")]
    MissingVariant(String),
    #[error("manifest lists unsupported platform '{0}'")]
    UnknownPlatformKey(String),
    #[error("manifest lists more than one checksum for {0}")]
    DuplicateVariant(String),
}
