//! OpenAPI v3 schema detector.
//!
//! Claims YAML documents whose top-level mapping declares `openapi: 3.x`,
//! annotates their schema entities and reports them. Other YAML files pass
//! through unclaimed, including ones with a nested `openapi:` key.

use std::path::Path;
use std::sync::Arc;

use glean_core::errors::{ConfigError, DetectionError, ScanError};
use glean_core::types::identifiers::NodeIdGenerator;
use glean_core::types::source::{FileInfo, FilePath};
use regex::bytes::Regex;

use super::traits::{Detector, DetectorKind};
use crate::annotation::{yaml, AnnotationPipeline, EntityMap, PassContext};
use crate::identity::NodeIdMap;
use crate::parsers::ParserManager;
use crate::report::ReportSink;
use crate::scanner::Language;

pub const OPENAPI_ID: &str = "openapi";

const VERSION_MARKER: &str = r#"(?m)^\s*["']?openapi["']?\s*:\s*["']?3"#;

pub struct OpenApiDetector {
    generator: Arc<dyn NodeIdGenerator>,
    pipeline: AnnotationPipeline,
    parser: ParserManager,
    marker: Regex,
    skip_dirs: Vec<String>,
}

impl OpenApiDetector {
    pub fn new(generator: Arc<dyn NodeIdGenerator>, skip_dirs: Vec<String>) -> Result<Self, ConfigError> {
        let marker = Regex::new(VERSION_MARKER).map_err(|e| ConfigError::InvalidValue {
            field: "openapi.version_marker".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            generator,
            pipeline: AnnotationPipeline::openapi_v3()?,
            parser: ParserManager::new(),
            marker,
            skip_dirs,
        })
    }

    /// Cheap prefilter: whether `content` may declare an OpenAPI 3 document.
    /// The marker can match nested keys; `annotate` confirms the position.
    pub fn declares_v3(&self, content: &[u8]) -> bool {
        self.marker.is_match(content)
    }

    /// Parse and annotate one document held in memory. `None` when the
    /// document's top-level mapping has no `openapi: 3.x` key.
    pub fn annotate(&self, source: &[u8], path: &Path) -> Result<Option<EntityMap>, DetectionError> {
        let parsed = self.parser.parse_strict(source, path, Language::Yaml)?;
        let version = yaml::document_mapping(parsed.tree().root_node())
            .and_then(|root| yaml::lookup_scalar(root, "openapi", source));
        if !version.is_some_and(|v| v.starts_with('3')) {
            tracing::debug!(path = %path.display(), "no top-level openapi 3 key");
            return Ok(None);
        }

        let ids = NodeIdMap::annotate(parsed.tree(), self.generator.as_ref());
        let ctx = PassContext::new(parsed.tree(), source, &ids);
        Ok(Some(self.pipeline.run(&ctx, EntityMap::new())?))
    }
}

impl Detector for OpenApiDetector {
    fn id(&self) -> &str {
        OPENAPI_ID
    }

    fn kind(&self) -> DetectorKind {
        DetectorKind::OpenApi
    }

    fn accept_dir(&self, dir: &FilePath) -> Result<bool, DetectionError> {
        Ok(!dir
            .name()
            .is_some_and(|name| self.skip_dirs.iter().any(|skip| skip == name)))
    }

    fn process_file(
        &self,
        file: &FileInfo,
        _dir: &FilePath,
        report: &dyn ReportSink,
    ) -> Result<bool, DetectionError> {
        let is_yaml = matches!(file.path.extension().as_deref(), Some("yaml" | "yml"));
        if !is_yaml {
            return Ok(false);
        }

        let source = std::fs::read(&file.path.absolute).map_err(|source| ScanError::IoError {
            path: file.path.absolute.clone(),
            source,
        })?;
        if !self.declares_v3(&source) {
            return Ok(false);
        }

        let Some(entities) = self.annotate(&source, &file.path.absolute)? else {
            return Ok(false);
        };
        tracing::debug!(
            file = %file.path.relative,
            schemas = entities.schemas.len(),
            operations = entities.operations.len(),
            "openapi document annotated"
        );
        report.add_schema(file, &entities, self.generator.as_ref());
        Ok(true)
    }
}
