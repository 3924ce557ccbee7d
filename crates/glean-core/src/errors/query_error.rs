//! Structural query errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while compiling a structural query.
/// A query that fails to compile is a configuration defect, not a per-file one.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Query {name} failed to compile at row {row}, column {column} ({kind}): {message}")]
    Compile {
        name: String,
        row: usize,
        column: usize,
        kind: String,
        message: String,
    },

    #[error("Query {name} has no capture named @{capture}")]
    MissingCapture { name: String, capture: String },
}

impl ErrorCode for QueryError {
    fn error_code(&self) -> &'static str {
        error_code::QUERY_ERROR
    }
}
