//! File discovery: parallel walk honouring ignore files and size limits.

pub mod language_detect;
pub mod types;
pub mod walker;

pub use language_detect::Language;
pub use types::DiscoveredFile;
pub use walker::walk_directory;
