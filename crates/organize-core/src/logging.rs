//! Opt-in log output for embedders and tests

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a global subscriber printing compact, human-readable events.
///
/// The level comes from `RUST_LOG` and defaults to `info`, which shows every
/// rename, move, trash and delete the engine performs or simulates. Fails if
/// a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
