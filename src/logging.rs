//! Logging initialization for `spindle_rust`.
//!
//! Verbosity mapping:
//! - default: warn
//! - `-v`: info
//! - `-vv`: debug
//! - `-vvv`: trace
//! - `--quiet`: error only
//!
//! `SPINDLE_LOG` overrides everything via the standard env-filter syntax.

use crate::error::Result;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TEST_INIT: Once = Once::new();

/// Initialize the global tracing subscriber for the CLI.
///
/// Logs go to stderr so they never mix with command output.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env("SPINDLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

/// Initialize logging for tests. Safe to call repeatedly.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("SPINDLE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_test_writer()
            .try_init();
    });
}
