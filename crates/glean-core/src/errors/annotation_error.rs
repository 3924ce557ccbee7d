//! Annotation pass errors.

use super::error_code::{self, ErrorCode};
use super::QueryError;

/// Structural failures of an annotation pass. Local anomalies inside a
/// document are never reported through this type.
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("Annotation pass {pass} has no syntax tree to work on")]
    MissingTree { pass: &'static str },

    #[error("Annotation pass {pass} failed: {message}")]
    PassFailed { pass: &'static str, message: String },

    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

impl ErrorCode for AnnotationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Query(e) => e.error_code(),
            _ => error_code::ANNOTATION_ERROR,
        }
    }
}
