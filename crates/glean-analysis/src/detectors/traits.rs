//! Detector trait: what a plugin must answer for every directory and file.

use std::fmt;

use glean_core::errors::DetectionError;
use glean_core::types::source::{FileInfo, FilePath};

use crate::report::ReportSink;

/// The built-in detector families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    SecretLeak,
    OpenApi,
}

impl DetectorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::SecretLeak => "secret-leak",
            Self::OpenApi => "openapi",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pluggable analysis over files.
///
/// Implementations hold only immutable configuration and are shared across
/// worker threads.
pub trait Detector: Send + Sync {
    /// Stable identifier used in diagnostics.
    fn id(&self) -> &str;

    fn kind(&self) -> DetectorKind;

    /// Whether files below `dir` are in scope. `false` skips the subtree.
    fn accept_dir(&self, dir: &FilePath) -> Result<bool, DetectionError>;

    /// Inspect one file and append findings to `report`.
    ///
    /// Returns `true` when the file is claimed: no later detector sees it.
    fn process_file(
        &self,
        file: &FileInfo,
        dir: &FilePath,
        report: &dyn ReportSink,
    ) -> Result<bool, DetectionError>;
}
