//! Detection errors.

use super::error_code::{self, ErrorCode};
use super::{AnnotationError, ParseError, QueryError, ScanError};

/// Errors a detector returns from `accept_dir` / `process_file`.
/// They abort that detector for that file only.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Detector {id} panicked: {message}")]
    DetectorPanic { id: String, message: String },
}

impl ErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Query(e) => e.error_code(),
            Self::Annotation(e) => e.error_code(),
            Self::DetectorPanic { .. } => error_code::DETECTOR_PANIC,
        }
    }
}
