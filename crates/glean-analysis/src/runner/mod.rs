//! Scan orchestration: walk, scope detectors per directory, process files in
//! parallel with per-call fault isolation.

pub mod scan_runner;
mod sink;

pub use scan_runner::{ScanRunner, ScanSummary};
