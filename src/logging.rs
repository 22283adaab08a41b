//! Logging init: stderr, filtered by `RUST_LOG` when set.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,rdm_install=info";
const VERBOSE_FILTER: &str = "info,rdm_install=debug";

/// Install the global subscriber. User-facing output stays on stdout; logs go
/// to stderr so `resolve --json` remains machine readable.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
