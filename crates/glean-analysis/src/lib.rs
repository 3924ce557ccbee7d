//! # glean-analysis
//!
//! Scanning engine: walks a source tree, parses files into syntax trees,
//! assigns node identities, runs structural queries and annotation passes,
//! and feeds detector findings into a report sink.

pub mod annotation;
pub mod detectors;
pub mod identity;
pub mod parsers;
pub mod query;
pub mod report;
pub mod runner;
pub mod scanner;
pub mod secrets;

pub use detectors::{create_default_registry, Detector, DetectorKind, DetectorRegistry};
pub use report::{Finding, InMemoryReport, ReportSink};
pub use runner::{ScanRunner, ScanSummary};
