//! File and source-location types shared by detectors and reports.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A path known both absolutely and relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilePath {
    pub absolute: PathBuf,
    /// Root-relative path with `/` separators. Empty for the root itself.
    pub relative: String,
}

impl FilePath {
    /// Build a `FilePath` for `absolute` under `root`.
    ///
    /// Paths outside `root` keep their full form as the relative part.
    pub fn new(root: &Path, absolute: &Path) -> Self {
        let relative = absolute
            .strip_prefix(root)
            .unwrap_or(absolute)
            .to_string_lossy()
            .replace('\\', "/");
        Self {
            absolute: absolute.to_path_buf(),
            relative,
        }
    }

    /// Final path component as a string, if any.
    pub fn name(&self) -> Option<&str> {
        self.absolute.file_name().and_then(|n| n.to_str())
    }

    /// Lower-cased extension, if any.
    pub fn extension(&self) -> Option<String> {
        self.absolute
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// A file handed to detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: FilePath,
    pub size: u64,
}

impl FileInfo {
    pub fn new(path: FilePath, size: u64) -> Self {
        Self { path, size }
    }

    /// Build a `FileInfo` from disk metadata.
    pub fn from_disk(root: &Path, absolute: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(absolute)?.len();
        Ok(Self::new(FilePath::new(root, absolute), size))
    }

    /// The directory containing this file, relative to the same root.
    pub fn dir(&self, root: &Path) -> FilePath {
        let parent = self.path.absolute.parent().unwrap_or(root);
        FilePath::new(root, parent)
    }
}

/// Canonical location of a finding.
///
/// Lines and columns are 1-based. `end_column` is the column immediately
/// after the last byte of the located text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub filename: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SourceSpan {
    /// Whether the span satisfies the ordering invariants.
    pub fn is_well_ordered(&self) -> bool {
        self.start_line >= 1
            && self.start_column >= 1
            && self.start_line <= self.end_line
            && (self.start_line != self.end_line || self.start_column <= self.end_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_strips_root() {
        let fp = FilePath::new(Path::new("/repo"), Path::new("/repo/api/openapi.yaml"));
        assert_eq!(fp.relative, "api/openapi.yaml");
        assert_eq!(fp.extension().as_deref(), Some("yaml"));
        assert_eq!(fp.name(), Some("openapi.yaml"));
    }

    #[test]
    fn root_itself_is_empty_relative() {
        let fp = FilePath::new(Path::new("/repo"), Path::new("/repo"));
        assert_eq!(fp.relative, "");
    }

    #[test]
    fn span_ordering() {
        let mut span = SourceSpan {
            filename: "a".into(),
            start_line: 3,
            start_column: 5,
            end_line: 3,
            end_column: 9,
            text: None,
        };
        assert!(span.is_well_ordered());
        span.end_column = 4;
        assert!(!span.is_well_ordered());
        span.end_line = 4;
        assert!(span.is_well_ordered());
    }
}
