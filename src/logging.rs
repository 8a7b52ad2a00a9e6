//! Diagnostic logging to stderr.
//!
//! stdout carries the pipeline output (JSON or the transcript line), so every
//! diagnostic goes through `tracing` to stderr instead.

use tracing_subscriber::EnvFilter;

/// Map CLI verbosity to a default filter directive.
///
/// `RUST_LOG`, when set, takes precedence over this.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity, quiet)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    // Already installed in this process; keep the first one.
    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
