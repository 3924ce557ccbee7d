//! `components: schemas:` entries become named object schemas.

use glean_core::errors::{AnnotationError, QueryError};
use tree_sitter::QueryCursor;

use super::{compile, queries, SchemaFacts};
use crate::annotation::model::{EntityMap, Schema, Span, COMPONENT_SCHEMA_PREFIX};
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct ComponentSchemasPass {
    query: CompiledQuery,
}

impl ComponentSchemasPass {
    pub const NAME: &'static str = "component_schemas";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: compile("openapi.component_schemas", queries::COMPONENT_SCHEMAS)?,
        })
    }
}

impl AnnotationPass for ComponentSchemasPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let Some(schemas) = capture.get("schemas") else {
                continue;
            };
            let Some(key) = capture.get("schemas_key") else {
                continue;
            };
            let Some(pair) = key.parent() else {
                continue;
            };
            if yaml::parent_key(pair, ctx.source).as_deref() != Some("components") {
                continue;
            }

            for entry in yaml::pairs(schemas) {
                let Some(name) = yaml::key_of(&entry, ctx.source) else {
                    tracing::debug!(pass = Self::NAME, "skipping non-scalar schema name");
                    continue;
                };
                let Some(body) = entry.value.and_then(yaml::mapping_of) else {
                    tracing::debug!(pass = Self::NAME, schema = %name, "schema has no mapping body");
                    continue;
                };
                let Some(anchor) = ctx.id(body) else {
                    continue;
                };

                let facts = SchemaFacts::read(body, ctx.source);
                let mut schema = Schema::new(anchor, Span::of(entry.key_node));
                schema.object_name = Some(name.clone());
                schema.field_type = facts.field_type();
                schema.simple_type = facts.simple_type();
                state.upsert_schema(schema);
                state.register_schema_name(&name, anchor);
            }
        }

        // Aliases (`Pet: {$ref: ...}`) can point at schemas declared later.
        let aliases: Vec<_> = state
            .schemas
            .values()
            .filter(|s| s.references.is_none())
            .filter_map(|s| {
                let target = s
                    .field_type
                    .as_deref()
                    .filter(|t| t.starts_with(COMPONENT_SCHEMA_PREFIX))?;
                let resolved = state.schema_anchor(target)?;
                (resolved != s.anchor && state.schema_names.get(s.object_name.as_deref()?) == Some(&s.anchor))
                    .then_some((s.anchor, resolved))
            })
            .collect();
        for (anchor, target) in aliases {
            if let Some(schema) = state.schemas.get_mut(&anchor) {
                schema.references = Some(target);
            }
        }

        Ok(state)
    }
}
