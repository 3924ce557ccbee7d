//! Structural queries: compile once, match lazily many times.

pub mod capture;
pub mod compiled;

pub use capture::{CaptureSet, CaptureSets};
pub use compiled::CompiledQuery;
