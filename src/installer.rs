use crate::config::InstallSettings;
use crate::error::InstallError;
use crate::manifest::{ReleaseVariant, Sha256Digest};
use crate::platform::platform;
use crate::receipt::Receipt;
use anyhow::{Context, Result};
use fs_err as fs;
use indicatif::ProgressBar;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const BUF_SIZE: usize = 64 * 1024;

/// Source of release bytes. The HTTP implementation is the only real one.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, InstallError>;
}

pub struct HttpFetcher {
    client: Client,
    max_attempts: u32,
    backoff: Duration,
}

enum Attempt {
    Retry(String),
    Fatal(String),
}

impl HttpFetcher {
    pub fn new(settings: &InstallSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("rdm-install/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self {
            client,
            max_attempts: settings.max_attempts.max(1),
            backoff: Duration::from_millis(500),
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn fetch_once(&self, url: &str) -> Result<Vec<u8>, Attempt> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| Attempt::Retry(e.to_string()))?;
        let status = resp.status();
        if status.is_server_error() {
            return Err(Attempt::Retry(format!("server returned {status}")));
        }
        if !status.is_success() {
            return Err(Attempt::Fatal(format!("server returned {status}")));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| Attempt::Retry(format!("reading body: {e}")))?;
        Ok(bytes.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, InstallError> {
        let mut attempt = 1;
        loop {
            tracing::debug!(url, attempt, "GET");
            let reason = match self.fetch_once(url) {
                Ok(bytes) => return Ok(bytes),
                Err(Attempt::Fatal(reason)) => reason,
                Err(Attempt::Retry(reason)) if attempt < self.max_attempts => {
                    tracing::warn!(url, attempt, "download failed, retrying: {reason}");
                    thread::sleep(self.backoff * attempt);
                    attempt += 1;
                    continue;
                }
                Err(Attempt::Retry(reason)) => reason,
            };
            return Err(InstallError::DownloadFailure {
                url: url.to_string(),
                reason,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { path: PathBuf, bytes: usize },
    AlreadyInstalled { path: PathBuf },
}

/// Where `variant` ends up inside `dest_dir`.
pub fn binary_path(variant_binary: &str, dest_dir: &Path) -> PathBuf {
    dest_dir.join(platform().final_binary_name(variant_binary))
}

/// Fetch, verify and place the binary for `variant` in `dest_dir`.
///
/// The destination is only touched once the downloaded bytes hash to the
/// expected checksum; the bytes are written to a sibling temp file and
/// renamed into place, so a failure never leaves a partial binary behind.
pub fn install(
    fetcher: &dyn Fetcher,
    variant: &ReleaseVariant,
    dest_dir: &Path,
    force: bool,
    pb: Option<&ProgressBar>,
) -> Result<InstallOutcome> {
    let bin_path = binary_path(&variant.local_binary_name, dest_dir);
    if !force && bin_path.exists() && digest_file(&bin_path)? == variant.checksum {
        tracing::info!("{} already matches {}", bin_path.display(), variant.checksum);
        match Receipt::load(dest_dir) {
            Ok(Some(_)) => {}
            Ok(None) => Receipt::for_variant(variant).save(dest_dir)?,
            Err(e) => {
                tracing::warn!("rewriting unreadable install receipt: {e:#}");
                Receipt::for_variant(variant).save(dest_dir)?;
            }
        }
        return Ok(InstallOutcome::AlreadyInstalled { path: bin_path });
    }

    if let Some(p) = pb {
        p.set_message(format!("GET {}", variant.download_url));
    }
    let bytes = fetcher.fetch(&variant.download_url)?;
    tracing::debug!(len = bytes.len(), "downloaded {}", variant.download_url);

    if let Some(p) = pb {
        p.set_message(format!("Verify {}", variant.local_binary_name));
    }
    verify_sha256(&bytes, &variant.download_url, &variant.checksum)?;

    ensure_dir(dest_dir)?;
    let partial = PartialFile::new(dest_dir, &variant.local_binary_name);
    fs::write(partial.path(), &bytes)?;
    platform().make_executable(partial.path())?;
    partial.persist(&bin_path)?;
    Receipt::for_variant(variant).save(dest_dir)?;

    tracing::info!(
        "installed {} {} to {}",
        variant.local_binary_name,
        variant.version,
        bin_path.display()
    );
    Ok(InstallOutcome::Installed {
        path: bin_path,
        bytes: bytes.len(),
    })
}

/// Removes the installed binary and its receipt; returns whether the binary existed.
pub fn uninstall(variant_binary: &str, dest_dir: &Path) -> Result<bool> {
    let bin_path = binary_path(variant_binary, dest_dir);
    let existed = bin_path.exists();
    if existed {
        fs::remove_file(&bin_path)?;
        tracing::info!("removed {}", bin_path.display());
    }
    Receipt::remove(dest_dir)?;
    Ok(existed)
}

pub fn verify_sha256(
    data: &[u8],
    location: &str,
    expected: &Sha256Digest,
) -> Result<(), InstallError> {
    let actual = Sha256Digest::of(data);
    if actual != *expected {
        return Err(InstallError::ChecksumMismatch {
            location: location.to_string(),
            expected: expected.to_hex(),
            actual: actual.to_hex(),
        });
    }
    Ok(())
}

/// SHA-256 of a file, read in chunks.
pub fn digest_file(path: &Path) -> Result<Sha256Digest> {
    let mut f = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    Ok(Sha256Digest::from(out))
}

fn ensure_dir(p: &Path) -> Result<()> {
    fs::create_dir_all(p).with_context(|| format!("creating dir {p:?}"))
}

/// Temp file next to the destination, deleted on drop unless persisted.
struct PartialFile {
    path: PathBuf,
    keep: bool,
}

impl PartialFile {
    fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!(".{name}.partial")),
            keep: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persist(mut self, dest: &Path) -> Result<()> {
        fs::rename(&self.path, dest)?;
        self.keep = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.keep && self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
