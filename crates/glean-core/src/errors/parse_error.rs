//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur while turning a file into a syntax tree.
/// Reported per file; other files keep going.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar could not be loaded for {language}: {message}")]
    GrammarLoad { language: String, message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("Syntax error in {path} at {line}:{column} ({kind})")]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
        kind: String,
    },

    #[error("Unsupported language: {extension}")]
    UnsupportedLanguage { extension: String },
}

impl ErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            Self::Syntax { .. } => error_code::SYNTAX_ERROR,
            _ => error_code::PARSE_ERROR,
        }
    }
}
