//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur during file discovery or file reads.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scan root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Invalid walk override {pattern}: {message}")]
    InvalidOverride { pattern: String, message: String },
}

impl ErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
