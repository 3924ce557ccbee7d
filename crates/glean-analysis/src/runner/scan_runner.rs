//! ScanRunner: drives every registered detector over a source tree.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;

use glean_core::errors::{DetectionError, PipelineError, PipelineResult, ScanError};
use glean_core::types::collections::FxHashMap;
use glean_core::types::source::FilePath;
use glean_core::GleanConfig;
use rayon::prelude::*;
use serde::Serialize;

use super::sink::CountingSink;
use crate::detectors::{Detector, DetectorRegistry};
use crate::report::ReportSink;
use crate::scanner::{walk_directory, DiscoveredFile};

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_claimed: usize,
    /// Files with at least one failed detector call.
    pub files_failed: usize,
    /// Directories outside the scope of at least one detector.
    pub dirs_skipped: usize,
    /// Findings appended to the sink during the run.
    pub findings: usize,
    pub discovery_ms: u64,
    pub processing_ms: u64,
}

/// Per-detector scope flags, in registry order.
type Scope = Vec<bool>;

struct FileOutcome {
    claimed: bool,
    errors: Vec<PipelineError>,
}

pub struct ScanRunner {
    registry: DetectorRegistry,
    config: GleanConfig,
}

impl ScanRunner {
    pub fn new(registry: DetectorRegistry, config: GleanConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GleanConfig {
        &self.config
    }

    /// Scan everything below `root`, appending findings to `report`.
    ///
    /// Only discovery failures are fatal. Every detector error or panic is
    /// collected in the result and confined to its file.
    pub fn run(
        &self,
        root: &Path,
        report: &dyn ReportSink,
    ) -> Result<PipelineResult<ScanSummary>, ScanError> {
        let discovery_start = Instant::now();
        let files = walk_directory(root, &self.config.scan)?;
        let discovery_ms = discovery_start.elapsed().as_millis() as u64;

        let mut result = PipelineResult::new(ScanSummary {
            files_scanned: files.len(),
            discovery_ms,
            ..Default::default()
        });

        let mut cache: FxHashMap<PathBuf, Scope> = FxHashMap::default();
        let scopes: Vec<Scope> = files
            .iter()
            .map(|file| {
                let dir = file.path.parent().unwrap_or(root);
                self.dir_scope(root, dir, &mut cache, &mut result.errors)
            })
            .collect();
        result.data.dirs_skipped = cache
            .values()
            .filter(|scope| scope.iter().any(|in_scope| !in_scope))
            .count();

        let processing_start = Instant::now();
        let sink = CountingSink::new(report);
        let outcomes = self.process_all(root, &files, &scopes, &sink);
        result.data.processing_ms = processing_start.elapsed().as_millis() as u64;

        for outcome in outcomes {
            if outcome.claimed {
                result.data.files_claimed += 1;
            }
            if !outcome.errors.is_empty() {
                result.data.files_failed += 1;
            }
            result.errors.extend(outcome.errors);
        }
        result.data.findings = sink.appended();

        tracing::info!(
            root = %root.display(),
            files = result.data.files_scanned,
            claimed = result.data.files_claimed,
            failed = result.data.files_failed,
            findings = result.data.findings,
            discovery_ms = result.data.discovery_ms,
            processing_ms = result.data.processing_ms,
            "scan complete"
        );
        Ok(result)
    }

    fn process_all(
        &self,
        root: &Path,
        files: &[DiscoveredFile],
        scopes: &[Scope],
        sink: &CountingSink<'_>,
    ) -> Vec<FileOutcome> {
        let work = || {
            files
                .par_iter()
                .zip(scopes.par_iter())
                .map(|(file, scope)| self.process_file(root, file, scope, sink))
                .collect::<Vec<_>>()
        };

        match self.config.scan.effective_threads() {
            0 => work(),
            threads => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(work),
                Err(e) => {
                    tracing::warn!(threads, error = %e, "falling back to the global thread pool");
                    work()
                }
            },
        }
    }

    /// Run the in-scope detectors on one file, in registry order, until one
    /// claims it.
    fn process_file(
        &self,
        root: &Path,
        file: &DiscoveredFile,
        scope: &[bool],
        sink: &CountingSink<'_>,
    ) -> FileOutcome {
        let info = file.file_info(root);
        let dir = info.dir(root);
        let mut outcome = FileOutcome {
            claimed: false,
            errors: Vec::new(),
        };

        let in_scope = self.registry.iter().zip(scope).filter(|(_, on)| **on);
        for (detector, _) in in_scope {
            let call = catch_unwind(AssertUnwindSafe(|| detector.process_file(&info, &dir, sink)));
            match call.unwrap_or_else(|payload| Err(panicked(detector, payload))) {
                Ok(true) => {
                    outcome.claimed = true;
                    break;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        path = %info.path.relative,
                        detector = detector.id(),
                        error = %e,
                        "detector failed on file"
                    );
                    outcome.errors.push(PipelineError::File {
                        path: info.path.absolute.clone(),
                        detector: detector.id().to_string(),
                        source: e,
                    });
                }
            }
        }
        outcome
    }

    /// Which detectors see files directly in `dir`. A directory is in scope
    /// for a detector when it and every ancestor below `root` were accepted.
    /// The root itself is always in scope.
    fn dir_scope(
        &self,
        root: &Path,
        dir: &Path,
        cache: &mut FxHashMap<PathBuf, Scope>,
        errors: &mut Vec<PipelineError>,
    ) -> Scope {
        if let Some(scope) = cache.get(dir) {
            return scope.clone();
        }

        let inherited = match dir.parent() {
            Some(parent) if dir != root && dir.starts_with(root) => {
                Some(self.dir_scope(root, parent, cache, errors))
            }
            _ => None,
        };

        let scope = match inherited {
            None => vec![true; self.registry.count()],
            Some(inherited) => {
                let path = FilePath::new(root, dir);
                self.registry
                    .iter()
                    .zip(inherited)
                    .map(|(detector, parent_in_scope)| {
                        parent_in_scope && self.accept_dir(detector, &path, errors)
                    })
                    .collect()
            }
        };

        cache.insert(dir.to_path_buf(), scope.clone());
        scope
    }

    /// Errors and panics count as a rejection.
    fn accept_dir(
        &self,
        detector: &dyn Detector,
        dir: &FilePath,
        errors: &mut Vec<PipelineError>,
    ) -> bool {
        let call = catch_unwind(AssertUnwindSafe(|| detector.accept_dir(dir)));
        match call.unwrap_or_else(|payload| Err(panicked(detector, payload))) {
            Ok(accepted) => {
                if !accepted {
                    tracing::debug!(dir = %dir.relative, detector = detector.id(), "directory skipped");
                }
                accepted
            }
            Err(e) => {
                tracing::warn!(
                    dir = %dir.relative,
                    detector = detector.id(),
                    error = %e,
                    "detector failed to decide directory"
                );
                errors.push(PipelineError::Directory {
                    path: dir.absolute.clone(),
                    detector: detector.id().to_string(),
                    source: e,
                });
                false
            }
        }
    }
}

fn panicked(detector: &dyn Detector, payload: Box<dyn Any + Send>) -> DetectionError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    tracing::error!(detector = detector.id(), %message, "detector panicked");
    DetectionError::DetectorPanic {
        id: detector.id().to_string(),
        message,
    }
}
