//! `$ref` to a component schema inside an operation links both ways.

use glean_core::errors::{AnnotationError, QueryError};
use tree_sitter::QueryCursor;

use super::{compile, queries};
use crate::annotation::model::EntityMap;
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct ReferencesPass {
    query: CompiledQuery,
}

impl ReferencesPass {
    pub const NAME: &'static str = "references";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: compile("openapi.references", queries::REFERENCES)?,
        })
    }
}

impl AnnotationPass for ReferencesPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let (Some(pair), Some(target_node)) = (capture.get("pair"), capture.get("target")) else {
                continue;
            };
            let Some(target) = yaml::scalar_value(target_node, ctx.source) else {
                continue;
            };
            let Some(pair_id) = ctx.id(pair) else {
                continue;
            };
            let Some(operation) =
                ctx.nearest_ancestor(pair_id, |a| state.operations.contains_key(&a))
            else {
                continue;
            };
            let Some(component) = state.schema_anchor(&target) else {
                tracing::debug!(pass = Self::NAME, target = %target, "unresolved $ref");
                continue;
            };

            state.link_operation_schema(operation, component);
            state.link_schema_operation(component, operation);
        }

        Ok(state)
    }
}
