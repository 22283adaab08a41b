//! Resolve, download, verify and install the `rdm` release binary for the
//! running host.
//!
//! ```
//! use rdm_install::manifest::resolve;
//! use rdm_install::platform::{Arch, Os};
//!
//! let v = resolve(&Os::Linux, &Arch::X86_64, "0.0.6").unwrap();
//! assert!(v.download_url.ends_with("/v0.0.6/rdm-linux-amd64"));
//! assert_eq!(v.local_binary_name, "rdm");
//! ```

pub mod cli;
pub mod command_handlers;
pub mod config;
pub mod error;
pub mod installer;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod receipt;

pub use error::{InstallError, ManifestError, ResolveError};
pub use manifest::{resolve, Manifest, ReleaseVariant, Sha256Digest};
