//! Tracing subscriber setup for the command-line adapter.
//!
//! `RUST_LOG` wins when set. Otherwise the level follows the verbosity flag:
//! `info` by default, `debug` with `-v`, `trace` with `-vv`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so stdout stays
/// reserved for command output.
pub(crate) fn init(verbosity: u8) -> Result<()> {
    let fallback = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialise logging: {error}"))
}
