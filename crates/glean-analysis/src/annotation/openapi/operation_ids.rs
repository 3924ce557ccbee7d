//! `operationId` under an HTTP-method mapping names the operation and the
//! schemas inside it that have no object name yet.

use glean_core::errors::{AnnotationError, QueryError};
use tree_sitter::QueryCursor;

use super::{compile, queries};
use crate::annotation::model::EntityMap;
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct OperationIdsPass {
    query: CompiledQuery,
}

impl OperationIdsPass {
    pub const NAME: &'static str = "operation_ids";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: compile("openapi.operation_ids", queries::OPERATION_IDS)?,
        })
    }
}

impl AnnotationPass for OperationIdsPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let (Some(pair), Some(value)) = (capture.get("pair"), capture.get("operation_id")) else {
                continue;
            };
            // links and callbacks also carry operationId keys
            let method = yaml::parent_key(pair, ctx.source);
            if !method.as_deref().is_some_and(yaml::is_http_method) {
                tracing::debug!(pass = Self::NAME, "operationId outside an operation");
                continue;
            }
            let Some(operation_id) = yaml::scalar_value(value, ctx.source) else {
                continue;
            };
            let Some(anchor) = pair.parent().and_then(|m| ctx.id(m)) else {
                continue;
            };

            state.register_operation_id(anchor, &operation_id);
            let name = state
                .operation_ids
                .get(&anchor)
                .cloned()
                .unwrap_or(operation_id);

            for (id, schema) in state.schemas.iter_mut() {
                if schema.object_name.is_none() && ctx.ids.is_ancestor(anchor, *id) {
                    schema.object_name = Some(name.clone());
                }
            }
        }

        Ok(state)
    }
}
