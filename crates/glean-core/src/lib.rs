//! # glean-core
//!
//! Foundation crate for the Glean scanning engine.
//! Defines errors, configuration, tracing setup, node identifiers and
//! source-location types. Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::GleanConfig;
pub use errors::error_code::ErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::identifiers::{NodeId, NodeIdGenerator, SequentialIdGenerator};
pub use types::source::{FileInfo, FilePath, SourceSpan};
