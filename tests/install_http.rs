use mockito::Server;
use rdm_install::cli::Commands;
use rdm_install::command_handlers::dispatch::dispatch;
use rdm_install::config::{InstallSettings, InstallerConfig, ManifestFile};
use rdm_install::installer::{self, Fetcher, HttpFetcher, InstallOutcome};
use rdm_install::platform::{Arch, HostPlatform, Os};
use rdm_install::receipt::Receipt;
use rdm_install::{InstallError, Sha256Digest};
use std::time::Duration;
use tempfile::tempdir;

const BODY: &[u8] = b"\x7fELF fake rdm binary";

/// A release table served by `base_url` whose linux-amd64 checksum is `linux_sum`.
fn manifest_toml(base_url: &str, linux_sum: &str) -> String {
    let other = Sha256Digest::of(b"other").to_hex();
    format!(
        r#"
version = "0.0.6"
base_url = "{base_url}"

[sha256]
darwin-arm64 = "{other}"
darwin-amd64 = "{other}"
linux-arm64 = "{other}"
linux-amd64 = "{linux_sum}"

[install]
max_attempts = 3
timeout_secs = 10
"#
    )
}

fn config(base_url: &str, linux_sum: &str) -> InstallerConfig {
    ManifestFile::parse(&manifest_toml(base_url, linux_sum))
        .unwrap()
        .into_config()
        .unwrap()
}

fn fetcher(settings: &InstallSettings) -> HttpFetcher {
    HttpFetcher::new(settings)
        .unwrap()
        .with_backoff(Duration::from_millis(1))
}

#[test]
fn downloads_verifies_and_installs() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/releases/download/v0.0.6/rdm-linux-amd64")
        .with_status(200)
        .with_body(BODY)
        .expect(1)
        .create();

    let cfg = config(&server.url(), &Sha256Digest::of(BODY).to_hex());
    let variant = cfg.manifest.resolve(&Os::Linux, &Arch::X86_64).unwrap();
    let dir = tempdir().unwrap();

    let outcome =
        installer::install(&fetcher(&cfg.settings), &variant, dir.path(), false, None).unwrap();

    mock.assert();
    let path = installer::binary_path("rdm", dir.path());
    assert_eq!(
        outcome,
        InstallOutcome::Installed {
            path: path.clone(),
            bytes: BODY.len()
        }
    );
    assert_eq!(std::fs::read(&path).unwrap(), BODY);
    let receipt = Receipt::load(dir.path()).unwrap().unwrap();
    assert_eq!(receipt.version, "0.0.6");
    assert_eq!(receipt.platform, "linux-amd64");
}

#[test]
fn not_found_is_a_download_failure_without_retry() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/releases/download/v0.0.6/rdm-linux-amd64")
        .with_status(404)
        .expect(1)
        .create();

    let cfg = config(&server.url(), &Sha256Digest::of(BODY).to_hex());
    let variant = cfg.manifest.resolve(&Os::Linux, &Arch::X86_64).unwrap();
    let dir = tempdir().unwrap();

    let err = installer::install(&fetcher(&cfg.settings), &variant, dir.path(), false, None)
        .unwrap_err();

    mock.assert();
    match err.downcast_ref::<InstallError>() {
        Some(InstallError::DownloadFailure { url, reason }) => {
            assert_eq!(url, &variant.download_url);
            assert!(reason.contains("404"), "{reason}");
        }
        other => panic!("expected download failure, got {other:?}"),
    }
    assert!(!installer::binary_path("rdm", dir.path()).exists());
}

#[test]
fn server_errors_are_retried_up_to_max_attempts() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/releases/download/v0.0.6/rdm-linux-amd64")
        .with_status(503)
        .expect(3)
        .create();

    let cfg = config(&server.url(), &Sha256Digest::of(BODY).to_hex());
    let variant = cfg.manifest.resolve(&Os::Linux, &Arch::X86_64).unwrap();

    let err = fetcher(&cfg.settings).fetch(&variant.download_url).unwrap_err();

    mock.assert();
    assert!(matches!(err, InstallError::DownloadFailure { .. }));
}

#[test]
fn tampered_download_is_rejected() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/releases/download/v0.0.6/rdm-linux-amd64")
        .with_status(200)
        .with_body("something else entirely")
        .create();

    let cfg = config(&server.url(), &Sha256Digest::of(BODY).to_hex());
    let variant = cfg.manifest.resolve(&Os::Linux, &Arch::X86_64).unwrap();
    let dir = tempdir().unwrap();

    let err = installer::install(&fetcher(&cfg.settings), &variant, dir.path(), false, None)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InstallError>(),
        Some(InstallError::ChecksumMismatch { .. })
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn install_then_verify_then_uninstall_through_dispatch() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/releases/download/v0.0.6/rdm-linux-amd64")
        .with_status(200)
        .with_body(BODY)
        .create();

    let manifest_dir = tempdir().unwrap();
    let manifest_path = manifest_dir.path().join("rdm.toml");
    std::fs::write(
        &manifest_path,
        manifest_toml(&server.url(), &Sha256Digest::of(BODY).to_hex()),
    )
    .unwrap();
    let cfg = InstallerConfig::load(Some(&manifest_path)).unwrap();
    let host = HostPlatform::new(Os::Linux, Arch::X86_64);
    let bin_dir = tempdir().unwrap();
    let dir = Some(bin_dir.path().to_path_buf());

    dispatch(
        Commands::Install {
            dir: dir.clone(),
            force: false,
        },
        &cfg,
        &host,
    )
    .unwrap();
    assert!(installer::binary_path("rdm", bin_dir.path()).exists());

    dispatch(Commands::Verify { dir: dir.clone() }, &cfg, &host).unwrap();
    dispatch(Commands::Status { dir: dir.clone() }, &cfg, &host).unwrap();
    dispatch(Commands::Uninstall { dir: dir.clone() }, &cfg, &host).unwrap();
    assert!(!installer::binary_path("rdm", bin_dir.path()).exists());
    assert!(Receipt::load(bin_dir.path()).unwrap().is_none());
}

#[test]
fn unsupported_host_fails_before_any_request() {
    let mut server = Server::new();
    let mock = server.mock("GET", mockito::Matcher::Any).expect(0).create();

    let cfg = config(&server.url(), &Sha256Digest::of(BODY).to_hex());
    let host = HostPlatform::new(Os::Windows, Arch::Arm64);
    let bin_dir = tempdir().unwrap();

    let err = dispatch(
        Commands::Install {
            dir: Some(bin_dir.path().to_path_buf()),
            force: false,
        },
        &cfg,
        &host,
    )
    .unwrap_err();

    mock.assert();
    assert!(matches!(
        err.downcast_ref::<rdm_install::ResolveError>(),
        Some(rdm_install::ResolveError::UnsupportedPlatform { .. })
    ));
}
