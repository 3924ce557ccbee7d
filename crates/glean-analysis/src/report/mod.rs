//! Report sink: the append-only destination of detector findings.

pub mod sink;
pub mod types;

pub use sink::{InMemoryReport, ReportSink};
pub use types::{schema_findings, Finding, OperationRef, SchemaRecord, Secret};
