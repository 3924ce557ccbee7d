//! Configuration errors.

use super::error_code::{self, ErrorCode};
use super::QueryError;

/// Errors that can occur during configuration loading and validation.
/// All of them are fatal at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid rule bundle {bundle}: {message}")]
    InvalidRuleBundle { bundle: String, message: String },

    #[error("Invalid rule {rule_id} in bundle {bundle}: {message}")]
    InvalidRule {
        bundle: String,
        rule_id: String,
        message: String,
    },

    #[error("Invalid structural query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRuleBundle { .. } | Self::InvalidRule { .. } => {
                error_code::RULE_BUNDLE_ERROR
            }
            Self::InvalidQuery(e) => e.error_code(),
            _ => error_code::CONFIG_ERROR,
        }
    }
}
