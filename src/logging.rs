//! Structured logging setup.
//!
//! Priority: `RUST_LOG` > `--verbose` (debug) > default (`warn`).
//! Output goes to stderr so stdout stays clean for reports and plots.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor `--verbose` is given.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialise the global tracing subscriber.
///
/// Calling this more than once is harmless: later calls are ignored.
pub fn init(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
}
