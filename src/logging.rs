//! Diagnostics for the command line tools.
//!
//! Installs a global `tracing` subscriber writing to `stderr`, so results on
//! `stdout` stay machine readable. `RUST_LOG` selects the level, `warn` when
//! unset.

use std::env;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INITIALISED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid filter in `RUST_LOG`: {source}")]
    InvalidFilter {
        #[source]
        source: tracing_subscriber::filter::FromEnvError,
    },
    #[error("failed to install tracing subscriber: {source}")]
    InstallFailed {
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

fn env_filter() -> Result<EnvFilter, LoggingError> {
    match env::var(EnvFilter::DEFAULT_ENV) {
        Ok(_) => EnvFilter::try_from_default_env().map_err(|source| LoggingError::InvalidFilter { source }),
        Err(_) => Ok(EnvFilter::new("warn")),
    }
}

/// Calling it again is a no-op; a subscriber installed by someone else is
/// left in place.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }
    let installed = tracing_subscriber::registry()
        .with(env_filter()?)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
    match installed {
        Ok(()) => {}
        Err(source) => eprintln!("{}", LoggingError::InstallFailed { source }),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging().expect("logging must initialise");
        init_logging().expect("subsequent calls must be no-ops");
    }
}
