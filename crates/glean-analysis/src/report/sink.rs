//! Report sink contract and the in-memory implementation.

use std::sync::Mutex;

use glean_core::types::identifiers::NodeIdGenerator;
use glean_core::types::source::{FileInfo, SourceSpan};

use super::types::{schema_findings, Finding, Secret};
use crate::annotation::model::EntityMap;

/// Append-only destination for findings, called concurrently from many
/// files. No ordering is promised across files.
pub trait ReportSink: Send + Sync {
    fn add_secret_leak(&self, secret: Secret, source: SourceSpan);

    fn add_schema(&self, file: &FileInfo, entities: &EntityMap, generator: &dyn NodeIdGenerator);
}

/// Findings held in memory behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryReport {
    findings: Mutex<Vec<Finding>>,
}

impl InMemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_all(&self, batch: impl IntoIterator<Item = Finding>) {
        let mut findings = self.findings.lock().unwrap_or_else(|e| e.into_inner());
        findings.extend(batch);
    }

    /// Snapshot of everything reported so far.
    pub fn findings(&self) -> Vec<Finding> {
        self.findings.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Findings whose span names `filename` (relative to the scan root).
    pub fn findings_for(&self, filename: &str) -> Vec<Finding> {
        self.findings()
            .into_iter()
            .filter(|f| f.source().filename == filename)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.findings.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the report, findings sorted by location for stable output.
    pub fn into_sorted(self) -> Vec<Finding> {
        let mut findings = self.findings.into_inner().unwrap_or_else(|e| e.into_inner());
        findings.sort_by(|a, b| {
            let (sa, sb) = (a.source(), b.source());
            (&sa.filename, sa.start_line, sa.start_column).cmp(&(&sb.filename, sb.start_line, sb.start_column))
        });
        findings
    }

    /// Pretty JSON of the current findings.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.findings())
    }
}

impl ReportSink for InMemoryReport {
    fn add_secret_leak(&self, secret: Secret, source: SourceSpan) {
        self.push_all([Finding::SecretLeak { secret, source }]);
    }

    fn add_schema(&self, file: &FileInfo, entities: &EntityMap, generator: &dyn NodeIdGenerator) {
        // one lock per file keeps a file's schemas contiguous
        self.push_all(schema_findings(file, entities, generator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak(filename: &str, line: u32) -> (Secret, SourceSpan) {
        (
            Secret {
                description: "token".to_string(),
                rule_id: Some("t".to_string()),
            },
            SourceSpan {
                filename: filename.to_string(),
                start_line: line,
                start_column: 1,
                end_line: line,
                end_column: 5,
                text: None,
            },
        )
    }

    #[test]
    fn sorted_by_location() {
        let report = InMemoryReport::new();
        for (file, line) in [("b.txt", 1), ("a.txt", 9), ("a.txt", 2)] {
            let (secret, span) = leak(file, line);
            report.add_secret_leak(secret, span);
        }
        let order: Vec<_> = report
            .into_sorted()
            .iter()
            .map(|f| (f.source().filename.clone(), f.source().start_line))
            .collect();
        assert_eq!(
            order,
            vec![("a.txt".to_string(), 2), ("a.txt".to_string(), 9), ("b.txt".to_string(), 1)]
        );
    }

    #[test]
    fn json_is_tagged() {
        let report = InMemoryReport::new();
        let (secret, span) = leak("a.txt", 1);
        report.add_secret_leak(secret, span);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["type"], "secret_leak");
        assert_eq!(json[0]["source"]["filename"], "a.txt");
        assert!(json[0]["source"].get("text").is_none());
    }
}
