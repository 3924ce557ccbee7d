//! Error handling for Glean.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod annotation_error;
pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod parse_error;
pub mod pipeline_error;
pub mod query_error;
pub mod scan_error;

pub use annotation_error::AnnotationError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use query_error::QueryError;
pub use scan_error::ScanError;
