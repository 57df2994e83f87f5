//! Diagnostic logging to stderr.
//!
//! `TSCAT_LOG` takes env-filter directives (`tscat_catalog=debug`) and wins
//! over the `--log-level` flag. Stdout stays reserved for command output.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TSCAT_LOG";

/// Filter from `TSCAT_LOG`, else from `fallback`, else `warn`.
#[must_use]
pub fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(fallback: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(fallback))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
