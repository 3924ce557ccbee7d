//! Scanner configuration.

use serde::{Deserialize, Serialize};

/// Default name of the per-directory ignore file (gitignore syntax).
pub const DEFAULT_IGNORE_FILENAME: &str = ".gleanignore";

/// Configuration for the file walker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes. Default: 1MB (1_048_576).
    pub max_file_size: Option<u64>,
    /// Number of threads. 0 = let the walker and rayon decide.
    pub threads: Option<usize>,
    /// Include glob patterns. When non-empty, only matching paths are scanned.
    /// Patterns use gitignore syntax (e.g., "src/**", "api/**").
    #[serde(default)]
    pub include: Vec<String>,
    /// Additional ignore patterns beyond .gitignore/.gleanignore.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Follow symbolic links. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Name of the custom ignore file. Default: ".gleanignore".
    pub ignore_filename: Option<String>,
}

impl ScanConfig {
    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(1_048_576)
    }

    /// Returns the effective thread count, defaulting to 0 (auto-detect).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns whether symlinks are followed, defaulting to false.
    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    /// Returns the custom ignore filename, defaulting to `.gleanignore`.
    pub fn effective_ignore_filename(&self) -> &str {
        self.ignore_filename
            .as_deref()
            .unwrap_or(DEFAULT_IGNORE_FILENAME)
    }
}
