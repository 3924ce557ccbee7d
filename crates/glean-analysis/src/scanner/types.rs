//! Scanner data types.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glean_core::types::source::{FileInfo, FilePath};

use super::language_detect::Language;

/// A file found by the walker, before any detector has looked at it.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub file_size: u64,
    pub mtime: SystemTime,
    pub language: Option<Language>,
}

impl DiscoveredFile {
    /// The detector-facing view of this file.
    pub fn file_info(&self, root: &Path) -> FileInfo {
        FileInfo::new(FilePath::new(root, &self.path), self.file_size)
    }
}
