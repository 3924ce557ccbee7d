//! `paths:` entries become operations, one per HTTP method.

use glean_core::errors::{AnnotationError, QueryError};
use glean_core::types::identifiers::NodeId;
use tree_sitter::{Node, QueryCursor};

use super::{compile, queries};
use crate::annotation::model::{push_unique, EntityMap, Operation, Span};
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct PathsPass {
    query: CompiledQuery,
}

impl PathsPass {
    pub const NAME: &'static str = "paths";

    pub fn new() -> Result<Self, QueryError> {
        Ok(Self {
            query: compile("openapi.paths", queries::PATHS)?,
        })
    }

    /// Anchors of known parameters listed under `parameters:` in `mapping`.
    /// `$ref` items resolve through the component parameter index.
    fn parameter_anchors(
        ctx: &PassContext<'_, '_>,
        state: &EntityMap,
        mapping: Node<'_>,
    ) -> Vec<NodeId> {
        let Some(list) = yaml::lookup(mapping, "parameters", ctx.source) else {
            return Vec::new();
        };
        yaml::sequence_items(list)
            .into_iter()
            .filter_map(yaml::mapping_of)
            .filter_map(|item| match yaml::lookup_scalar(item, "$ref", ctx.source) {
                Some(target) => {
                    let resolved = state.parameter_anchor(&target);
                    if resolved.is_none() {
                        tracing::debug!(pass = Self::NAME, target = %target, "unresolved parameter $ref");
                    }
                    resolved
                }
                None => ctx.id(item).filter(|id| state.parameters.contains_key(id)),
            })
            .collect()
    }

    /// Schemas whose anchor lies under `scope`.
    fn schemas_under(ctx: &PassContext<'_, '_>, state: &EntityMap, scope: NodeId) -> Vec<NodeId> {
        state
            .schemas
            .keys()
            .copied()
            .filter(|id| ctx.ids.is_ancestor(scope, *id))
            .collect()
    }
}

impl AnnotationPass for PathsPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let (Some(pair), Some(paths)) = (capture.get("pair"), capture.get("paths")) else {
                continue;
            };
            // only the document-level `paths` key
            if pair.parent().and_then(yaml::owner_pair).is_some() {
                continue;
            }

            for path_entry in yaml::pairs(paths) {
                let Some(path) = yaml::key_of(&path_entry, ctx.source) else {
                    continue;
                };
                let Some(path_item) = path_entry.value.and_then(yaml::mapping_of) else {
                    tracing::debug!(pass = Self::NAME, path = %path, "path item is not a mapping");
                    continue;
                };
                let shared = Self::parameter_anchors(ctx, &state, path_item);

                for method_entry in yaml::pairs(path_item) {
                    let Some(method) = yaml::key_of(&method_entry, ctx.source) else {
                        continue;
                    };
                    if !yaml::is_http_method(&method) {
                        continue;
                    }
                    let Some(operation) = method_entry.value.and_then(yaml::mapping_of) else {
                        tracing::debug!(pass = Self::NAME, path = %path, method = %method, "operation is not a mapping");
                        continue;
                    };
                    let Some(anchor) = ctx.id(operation) else {
                        continue;
                    };

                    let mut parameters = shared.clone();
                    for p in Self::parameter_anchors(ctx, &state, operation) {
                        push_unique(&mut parameters, p);
                    }
                    // path-level and referenced parameters live outside the operation
                    let parameter_schemas: Vec<NodeId> = parameters
                        .iter()
                        .filter_map(|p| state.parameters.get(p).map(|p| p.schema))
                        .collect();
                    let parameter_refs: Vec<NodeId> = parameters
                        .iter()
                        .filter_map(|p| state.parameters.get(p).and_then(|p| p.schema_ref))
                        .collect();
                    let operation_id = state.operation_ids.get(&anchor).cloned();

                    state.upsert_operation(Operation {
                        anchor,
                        path: path.clone(),
                        method: method.clone(),
                        operation_id: operation_id.clone(),
                        parameters,
                        referenced_schemas: Vec::new(),
                        span: Span::of(method_entry.key_node),
                    });

                    for schema in &parameter_schemas {
                        if let (Some(s), Some(id)) = (state.schemas.get_mut(schema), &operation_id) {
                            if s.object_name.is_none() {
                                s.object_name = Some(id.clone());
                            }
                        }
                    }
                    for schema in Self::schemas_under(ctx, &state, anchor)
                        .into_iter()
                        .chain(parameter_schemas.iter().copied())
                    {
                        state.link_schema_operation(schema, anchor);
                    }
                    for component in parameter_refs {
                        state.link_operation_schema(anchor, component);
                        state.link_schema_operation(component, anchor);
                    }
                }
            }
        }

        Ok(state)
    }
}
