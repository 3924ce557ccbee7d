//! Pass-through sink that counts what detectors append.

use std::sync::atomic::{AtomicUsize, Ordering};

use glean_core::types::identifiers::NodeIdGenerator;
use glean_core::types::source::{FileInfo, SourceSpan};

use crate::annotation::EntityMap;
use crate::report::{ReportSink, Secret};

pub(crate) struct CountingSink<'a> {
    inner: &'a dyn ReportSink,
    appended: AtomicUsize,
}

impl<'a> CountingSink<'a> {
    pub(crate) fn new(inner: &'a dyn ReportSink) -> Self {
        Self {
            inner,
            appended: AtomicUsize::new(0),
        }
    }

    pub(crate) fn appended(&self) -> usize {
        self.appended.load(Ordering::Relaxed)
    }
}

impl ReportSink for CountingSink<'_> {
    fn add_secret_leak(&self, secret: Secret, source: SourceSpan) {
        self.appended.fetch_add(1, Ordering::Relaxed);
        self.inner.add_secret_leak(secret, source);
    }

    fn add_schema(&self, file: &FileInfo, entities: &EntityMap, generator: &dyn NodeIdGenerator) {
        self.appended.fetch_add(entities.schemas.len(), Ordering::Relaxed);
        self.inner.add_schema(file, entities, generator);
    }
}
