//! OpenAPI v3 YAML annotation passes.
//!
//! Order matters: component schemas and parameters populate the name index
//! and the schema table that operation ids, object properties, paths and
//! references then link into.

pub mod component_schemas;
pub mod objects;
pub mod operation_ids;
pub mod parameters;
pub mod paths;
pub mod queries;
pub mod references;

use glean_core::errors::QueryError;
use tree_sitter::Node;

pub use component_schemas::ComponentSchemasPass;
pub use objects::ObjectsPass;
pub use operation_ids::OperationIdsPass;
pub use parameters::ParametersPass;
pub use paths::PathsPass;
pub use references::ReferencesPass;

use super::model::SimpleType;
use super::pipeline::AnnotationPass;
use super::yaml;
use crate::query::CompiledQuery;
use crate::scanner::language_detect::Language;

/// Build the six passes in pipeline order.
pub fn passes() -> Result<Vec<Box<dyn AnnotationPass>>, QueryError> {
    Ok(vec![
        Box::new(ComponentSchemasPass::new()?),
        Box::new(ParametersPass::new()?),
        Box::new(OperationIdsPass::new()?),
        Box::new(ObjectsPass::new()?),
        Box::new(PathsPass::new()?),
        Box::new(ReferencesPass::new()?),
    ])
}

pub(crate) fn compile(name: &str, source: &str) -> Result<CompiledQuery, QueryError> {
    CompiledQuery::compile(&Language::Yaml.ts_language(), name, source)
}

/// Type facts read from a schema mapping.
#[derive(Debug, Default)]
pub(crate) struct SchemaFacts {
    pub type_name: Option<String>,
    pub format: Option<String>,
    pub ref_target: Option<String>,
}

impl SchemaFacts {
    pub fn read(body: Node<'_>, source: &[u8]) -> Self {
        Self {
            type_name: yaml::lookup_scalar(body, "type", source),
            format: yaml::lookup_scalar(body, "format", source),
            ref_target: yaml::lookup_scalar(body, "$ref", source),
        }
    }

    pub fn field_type(&self) -> Option<String> {
        self.ref_target.clone().or_else(|| self.type_name.clone())
    }

    pub fn simple_type(&self) -> SimpleType {
        SimpleType::classify(
            self.type_name.as_deref(),
            self.format.as_deref(),
            self.ref_target.is_some(),
        )
    }
}
