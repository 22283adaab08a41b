use crate::platform::{Arch, Os};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    name = "rdm-install",
    about = "Fetch, verify and install the rdm release binary for this platform"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Release table to use instead of the built-in one (TOML)
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Override the detected operating system (darwin|linux|...)
    #[arg(long, global = true, value_parser = parse_os)]
    pub os: Option<Os>,

    /// Override the detected CPU architecture (arm64|amd64|...)
    #[arg(long, global = true, value_parser = parse_arch)]
    pub arch: Option<Arch>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the release table
    Info,
    /// Print the download URL, checksum and binary name for this platform
    Resolve {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Download, verify and install rdm
    Install {
        /// Target directory (defaults to ~/.rdm/bin)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Re-download even if the installed binary already matches
        #[arg(long)]
        force: bool,
    },
    /// Check the installed binary against the expected checksum (no network)
    Verify {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Show what is installed and whether it is current
    Status {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Remove the installed binary and its receipt
    Uninstall {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn parse_os(raw: &str) -> Result<Os, String> {
    if raw.trim().is_empty() {
        return Err("empty os".into());
    }
    Ok(Os::parse(raw))
}

fn parse_arch(raw: &str) -> Result<Arch, String> {
    if raw.trim().is_empty() {
        return Err("empty arch".into());
    }
    Ok(Arch::parse(raw))
}
