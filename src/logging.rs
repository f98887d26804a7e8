// SPDX-License-Identifier: MPL-2.0
//! Log output setup.
//!
//! Logs go to stderr through `tracing-subscriber`. The filter is read from
//! `KAITORI_LOG` using the usual `EnvFilter` directive syntax
//! (e.g. `KAITORI_LOG=kaitori_admin=debug`) and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KAITORI_LOG";

const DEFAULT_FILTER: &str = "info";

/// Builds the filter from `KAITORI_LOG`, falling back to `info`.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
