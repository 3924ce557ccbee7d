//! `name:` + `schema:` mappings become a field schema and a parameter.
//! Parameters declared under `components: parameters:` are also indexed by
//! name so `$ref`s from operations can reach them.

use glean_core::errors::{AnnotationError, QueryError};
use tree_sitter::{Node, QueryCursor};

use super::{compile, queries, SchemaFacts};
use crate::annotation::model::{EntityMap, Parameter, Schema, Span};
use crate::annotation::pipeline::{AnnotationPass, PassContext};
use crate::annotation::yaml;
use crate::query::CompiledQuery;

pub struct ParametersPass {
    query: CompiledQuery,
}

impl ParametersPass {
    pub const NAME: &'static str = "parameters";

    pub fn new() -> Result<Self, QueryError> {
        let query = compile("openapi.parameters", queries::PARAMETERS)?;
        query.capture_index("param")?;
        Ok(Self { query })
    }

    /// `Name` when `param` is the value of `components: parameters: Name:`.
    fn component_name(param: Node<'_>, source: &[u8]) -> Option<String> {
        let entry = yaml::owner_pair(param)?;
        if yaml::parent_key(entry, source)? != "parameters" {
            return None;
        }
        let section = yaml::owner_pair(entry.parent()?)?;
        if yaml::parent_key(section, source)? != "components" {
            return None;
        }
        yaml::scalar_value(entry.child_by_field_name("key")?, source)
    }
}

impl AnnotationPass for ParametersPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn run(&self, ctx: &PassContext<'_, '_>, mut state: EntityMap) -> Result<EntityMap, AnnotationError> {
        let root = ctx.root(Self::NAME)?;
        let mut cursor = QueryCursor::new();

        for capture in self.query.matches(&mut cursor, root, ctx.source) {
            let Some(param) = capture.get("param") else {
                continue;
            };
            let Some(name_node) = yaml::lookup(param, "name", ctx.source) else {
                continue;
            };
            let Some(name) = yaml::scalar_value(name_node, ctx.source) else {
                tracing::debug!(pass = Self::NAME, "parameter name is not a scalar");
                continue;
            };
            let Some(body) = yaml::lookup(param, "schema", ctx.source).and_then(yaml::mapping_of) else {
                continue;
            };
            let (Some(param_anchor), Some(schema_anchor)) = (ctx.id(param), ctx.id(body)) else {
                continue;
            };

            let facts = SchemaFacts::read(body, ctx.source);
            let schema_ref = match facts.ref_target.as_deref() {
                Some(target) => {
                    let resolved = state.schema_anchor(target);
                    if resolved.is_none() {
                        tracing::debug!(pass = Self::NAME, target, "unresolved parameter $ref");
                    }
                    resolved
                }
                None => None,
            };

            let mut schema = Schema::new(schema_anchor, Span::of(name_node));
            schema.field_name = Some(name.clone());
            schema.field_type = facts.field_type();
            schema.simple_type = facts.simple_type();
            schema.references = schema_ref;
            state.upsert_schema(schema);

            state.upsert_parameter(Parameter {
                anchor: param_anchor,
                name,
                location: yaml::lookup_scalar(param, "in", ctx.source),
                schema: schema_anchor,
                schema_ref,
            });
            if let Some(component) = Self::component_name(param, ctx.source) {
                state.register_parameter_name(&component, param_anchor);
            }
        }

        Ok(state)
    }
}
