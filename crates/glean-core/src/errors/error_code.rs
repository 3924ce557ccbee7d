//! ErrorCode trait for stable, machine-readable error identifiers.

/// Every error enum implements this to expose a structured code string
/// that report consumers can aggregate on without parsing messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic string: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const QUERY_ERROR: &str = "QUERY_ERROR";
pub const ANNOTATION_ERROR: &str = "ANNOTATION_ERROR";
pub const DETECTOR_PANIC: &str = "DETECTOR_PANIC";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const RULE_BUNDLE_ERROR: &str = "RULE_BUNDLE_ERROR";
