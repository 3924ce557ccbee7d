//! DetectorRegistry: fixed ordered list of detectors.

use std::sync::Arc;

use glean_core::errors::ConfigError;
use glean_core::types::identifiers::NodeIdGenerator;
use glean_core::GleanConfig;

use super::openapi::OpenApiDetector;
use super::secrets::SecretLeakDetector;
use super::traits::{Detector, DetectorKind};

/// Detectors in the order they see each file.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Append a detector. It runs after every detector registered before it.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn get(&self, index: usize) -> Option<&dyn Detector> {
        self.detectors.get(index).map(|d| d.as_ref())
    }

    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    /// Total number of registered detectors.
    pub fn count(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DetectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.detectors.iter().map(|d| d.id())).finish()
    }
}

/// Build `[SecretLeak, OpenApi]`, leaving out any detector disabled in
/// `config`. Rule bundles and queries are compiled here, once.
pub fn create_default_registry(
    config: &GleanConfig,
    generator: Arc<dyn NodeIdGenerator>,
) -> Result<DetectorRegistry, ConfigError> {
    let mut registry = DetectorRegistry::new();

    if config.secrets.effective_enabled() {
        let detector = match &config.secrets.rules_path {
            Some(path) => SecretLeakDetector::from_bundle_file(path)?,
            None => SecretLeakDetector::with_embedded_rules()?,
        };
        registry.register(Box::new(detector));
    }

    if config.openapi.effective_enabled() {
        registry.register(Box::new(OpenApiDetector::new(
            generator,
            config.openapi.effective_skip_dirs(),
        )?));
    }

    tracing::debug!(detectors = ?registry, "detector registry built");
    Ok(registry)
}
