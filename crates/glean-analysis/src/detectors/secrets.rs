//! Secret leak detector: reports every rule match, never claims a file.

use std::path::Path;
use std::sync::Arc;

use glean_core::errors::{ConfigError, DetectionError};
use glean_core::types::source::{FileInfo, FilePath, SourceSpan};

use super::traits::{Detector, DetectorKind};
use crate::report::{ReportSink, Secret};
use crate::secrets::{SecretRuleSet, SecretScanner};

pub const SECRET_LEAK_ID: &str = "secret-leak";

pub struct SecretLeakDetector {
    scanner: SecretScanner,
}

impl SecretLeakDetector {
    pub fn new(rules: Arc<SecretRuleSet>) -> Self {
        Self {
            scanner: SecretScanner::new(rules),
        }
    }

    pub fn with_embedded_rules() -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(SecretRuleSet::embedded()?)))
    }

    pub fn from_bundle_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(SecretRuleSet::from_path(path)?)))
    }

    pub fn scanner(&self) -> &SecretScanner {
        &self.scanner
    }
}

impl Detector for SecretLeakDetector {
    fn id(&self) -> &str {
        SECRET_LEAK_ID
    }

    fn kind(&self) -> DetectorKind {
        DetectorKind::SecretLeak
    }

    fn accept_dir(&self, _dir: &FilePath) -> Result<bool, DetectionError> {
        Ok(true)
    }

    fn process_file(
        &self,
        file: &FileInfo,
        _dir: &FilePath,
        report: &dyn ReportSink,
    ) -> Result<bool, DetectionError> {
        let matches = self.scanner.scan_file(&file.path.absolute)?;
        if !matches.is_empty() {
            tracing::debug!(file = %file.path.relative, count = matches.len(), "secret matches");
        }

        for m in matches {
            let text = m.line.strip_prefix('\n').unwrap_or(&m.line).to_string();
            report.add_secret_leak(
                Secret {
                    description: m.description,
                    rule_id: Some(m.rule_id),
                },
                SourceSpan {
                    filename: file.path.relative.clone(),
                    start_line: m.start_line,
                    start_column: m.start_column,
                    end_line: m.end_line,
                    end_column: m.end_column,
                    text: Some(text),
                },
            );
        }
        Ok(false)
    }
}
