//! Finding types and the conversion of annotated entities into findings.

use glean_core::types::collections::FxHashMap;
use glean_core::types::identifiers::{NodeId, NodeIdGenerator};
use glean_core::types::source::{FileInfo, SourceSpan};
use serde::{Deserialize, Serialize};

use crate::annotation::model::{EntityMap, SimpleType, Span};

/// Descriptor of a leaked secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

/// Operation summary attached to a reported schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRef {
    pub path: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

/// A schema entity as it appears in the report.
///
/// `id` and `parent_id` are report-scoped identities handed out by the
/// caller's generator, independent of the tree the schema came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    pub simple_type: SimpleType,
    /// Name of the component schema a `$ref` resolved to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationRef>,
}

/// Everything a detector can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    SecretLeak { secret: Secret, source: SourceSpan },
    SchemaAnnotation { schema: SchemaRecord, source: SourceSpan },
}

impl Finding {
    pub fn source(&self) -> &SourceSpan {
        match self {
            Self::SecretLeak { source, .. } | Self::SchemaAnnotation { source, .. } => source,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::SecretLeak { secret, .. } => secret.description.clone(),
            Self::SchemaAnnotation { schema, .. } => {
                match (schema.object_name.as_deref(), schema.field_name.as_deref()) {
                    (Some(o), Some(f)) => format!("API schema field {o}.{f}"),
                    (Some(o), None) => format!("API schema {o}"),
                    (None, Some(f)) => format!("API schema field {f}"),
                    (None, None) => "API schema".to_string(),
                }
            }
        }
    }

    pub fn is_secret_leak(&self) -> bool {
        matches!(self, Self::SecretLeak { .. })
    }
}

/// Turn every schema entity into a `SchemaAnnotation`, in anchor order.
pub fn schema_findings(
    file: &FileInfo,
    entities: &EntityMap,
    generator: &dyn NodeIdGenerator,
) -> Vec<Finding> {
    let record_ids: FxHashMap<NodeId, NodeId> = entities
        .schemas
        .keys()
        .map(|anchor| (*anchor, generator.next_id()))
        .collect();

    entities
        .schemas
        .values()
        .map(|schema| {
            let operations = schema
                .operations
                .iter()
                .filter_map(|op| entities.operations.get(op))
                .map(|op| OperationRef {
                    path: op.path.clone(),
                    method: op.method.clone(),
                    operation_id: op.operation_id.clone(),
                })
                .collect();
            let references = schema
                .references
                .and_then(|r| entities.schemas.get(&r))
                .and_then(|s| s.object_name.clone());

            Finding::SchemaAnnotation {
                schema: SchemaRecord {
                    id: record_ids[&schema.anchor],
                    parent_id: schema.parent.and_then(|p| record_ids.get(&p).copied()),
                    object_name: schema.object_name.clone(),
                    field_name: schema.field_name.clone(),
                    field_type: schema.field_type.clone(),
                    simple_type: schema.simple_type,
                    references,
                    operations,
                },
                source: span_in(file, schema.span),
            }
        })
        .collect()
}

fn span_in(file: &FileInfo, span: Span) -> SourceSpan {
    SourceSpan {
        filename: file.path.relative.clone(),
        start_line: span.start_line,
        start_column: span.start_column,
        end_line: span.end_line,
        end_column: span.end_column,
        text: None,
    }
}
