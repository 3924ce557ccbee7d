//! `properties:` entries become field schemas owned by the enclosing schema.

use glean_core::errors::{AnnotationError, QueryError};
use glean_core::types::identifiers::NodeId;
use tree_sitter::QueryCursor;

use super::{compile, queries, SchemaFacts};
use crate::annotation::model::{EntityMap, Schema, Span};
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct ObjectsPass {
    query: CompiledQuery,
}

impl ObjectsPass {
    pub const NAME: &'static str = "objects";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: compile("openapi.objects", queries::OBJECTS)?,
        })
    }

    /// Owner schema anchor and the object name its fields inherit.
    fn owner(ctx: &PassContext<'_, '_>, state: &EntityMap, properties: NodeId) -> (Option<NodeId>, Option<String>) {
        let owner = ctx.nearest_ancestor(properties, |a| state.schemas.contains_key(&a));
        if let Some(name) = owner
            .and_then(|o| state.schemas.get(&o))
            .and_then(|s| s.display_name())
        {
            return (owner, Some(name.to_string()));
        }
        let operation_name = ctx
            .nearest_ancestor(properties, |a| state.operation_ids.contains_key(&a))
            .and_then(|op| state.operation_ids.get(&op).cloned());
        (owner, operation_name)
    }
}

impl AnnotationPass for ObjectsPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        // Outer `properties` blocks come first in document order, so nested
        // fields always find their owner already in the map.
        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let Some(properties) = capture.get("properties") else {
                continue;
            };
            let Some(properties_id) = ctx.id(properties) else {
                continue;
            };
            let (parent, object_name) = Self::owner(ctx, &state, properties_id);

            for entry in yaml::pairs(properties) {
                let Some(field) = yaml::key_of(&entry, ctx.source) else {
                    tracing::debug!(pass = Self::NAME, "skipping non-scalar property name");
                    continue;
                };
                let Some(body) = entry.value.and_then(yaml::mapping_of) else {
                    tracing::debug!(pass = Self::NAME, field = %field, "property without a schema mapping");
                    continue;
                };
                let Some(anchor) = ctx.id(body) else {
                    continue;
                };

                let facts = SchemaFacts::read(body, ctx.source);
                let references = facts
                    .ref_target
                    .as_deref()
                    .and_then(|target| state.schema_anchor(target));

                let mut schema = Schema::new(anchor, Span::of(entry.key_node));
                schema.object_name = object_name.clone();
                schema.field_name = Some(field);
                schema.field_type = facts.field_type();
                schema.simple_type = facts.simple_type();
                schema.parent = parent;
                schema.references = references;
                state.upsert_schema(schema);
            }
        }

        Ok(state)
    }
}
