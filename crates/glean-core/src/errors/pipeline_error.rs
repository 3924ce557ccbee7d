//! Pipeline errors and non-fatal error collection.

use std::path::PathBuf;

use super::error_code::ErrorCode;
use super::{ConfigError, DetectionError, ScanError};

/// Errors that can occur during a scan run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Detector {detector} failed on {path}: {source}")]
    File {
        path: PathBuf,
        detector: String,
        source: DetectionError,
    },

    #[error("Detector {detector} failed to decide directory {path}: {source}")]
    Directory {
        path: PathBuf,
        detector: String,
        source: DetectionError,
    },
}

impl PipelineError {
    /// The file or directory this error is attached to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File { path, .. } | Self::Directory { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::File { source, .. } | Self::Directory { source, .. } => {
                source.error_code()
            }
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the pipeline run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Errors attached to a given path.
    pub fn errors_for(&self, path: &std::path::Path) -> Vec<&PipelineError> {
        self.errors
            .iter()
            .filter(|e| e.path().map(|p| p.as_path() == path).unwrap_or(false))
            .collect()
    }
}
