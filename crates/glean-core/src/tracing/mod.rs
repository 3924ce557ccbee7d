//! Observability for Glean.
//! `tracing` events throughout; an `EnvFilter` driven by `GLEAN_LOG` for
//! hosts that opt in to Glean's subscriber.

pub mod setup;

pub use setup::{env_filter, init_tracing};
