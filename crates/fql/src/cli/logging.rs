//! Diagnostic logging for the CLI.

use std::io;

use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence when set. Otherwise the level is `warn`, raised to
/// `debug` by `-v` and `trace` by `-vv`.
pub fn init(verbose: u8) {
    let fallback = default_level(verbose);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Maps the `-v` count to a filter directive.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
