//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never interleave with the report on stdout.
//! `RUST_LOG` takes precedence over the level given on the command line.

use super::CliError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(default_filter: &str) -> Result<(), CliError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| CliError::Logging(e.to_string()))?,
    };

    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(terminal_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
