//! Opt-in subscriber setup for hosts embedding the engine.
//!
//! The engine only emits events. Nothing in `glean-core` or
//! `glean-analysis` installs a subscriber; a front end that wants Glean's
//! formatting calls [`init_tracing`] once at startup, before the first scan.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "GLEAN_LOG";

/// Filter used when `GLEAN_LOG` is unset or invalid. Matches every
/// `glean_*` crate target.
pub const DEFAULT_FILTER: &str = "glean=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Filter built from `GLEAN_LOG`, e.g.
/// `GLEAN_LOG=glean_analysis::annotation=debug,glean_analysis::runner=info`.
pub fn env_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives.trim())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        _ => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install Glean's global subscriber: compact lines on stderr with targets
/// and thread ids, filtered by [`env_filter`].
///
/// Only the first call does anything. Returns whether Glean's subscriber is
/// the global one; `false` means the host had already installed its own,
/// which is left in place.
pub fn init_tracing() -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .with(env_filter())
            .try_init()
            .is_ok()
    })
}
