//! Semantic entities and the identity-keyed map that holds them.
//!
//! Merge rule: the first writer of an entity wins. A later writer for the
//! same anchor may only fill fields that are still empty and append to link
//! lists (de-duplicated). Name indexes follow the same rule.

use std::collections::BTreeMap;

use glean_core::types::identifiers::NodeId;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Prefix of local component schema references.
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Prefix of local component parameter references.
pub const COMPONENT_PARAMETER_PREFIX: &str = "#/components/parameters/";

/// Coarse classification of a schema's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleType {
    String,
    Date,
    Number,
    Boolean,
    Object,
    Array,
    #[default]
    Unknown,
}

impl SimpleType {
    /// Classify from `type`, `format` and whether the schema is a `$ref`.
    pub fn classify(type_name: Option<&str>, format: Option<&str>, is_ref: bool) -> Self {
        if is_ref {
            return Self::Object;
        }
        match type_name {
            Some("string") => match format {
                Some("date") | Some("date-time") => Self::Date,
                _ => Self::String,
            },
            Some("integer") | Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            Some("object") => Self::Object,
            Some("array") => Self::Array,
            _ => Self::Unknown,
        }
    }
}

/// 1-based source location of an entity. `end_column` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn of(node: Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: start.row as u32 + 1,
            start_column: start.column as u32 + 1,
            end_line: end.row as u32 + 1,
            end_column: end.column as u32 + 1,
        }
    }
}

/// A schema object or a field of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub anchor: NodeId,
    pub object_name: Option<String>,
    pub field_name: Option<String>,
    /// Declared `type`, or the `$ref` target for references.
    pub field_type: Option<String>,
    pub simple_type: SimpleType,
    /// Anchor of the enclosing schema.
    pub parent: Option<NodeId>,
    /// Anchor of the component schema a `$ref` resolved to.
    pub references: Option<NodeId>,
    /// Anchors of operations this schema takes part in.
    pub operations: Vec<NodeId>,
    pub span: Span,
}

impl Schema {
    pub fn new(anchor: NodeId, span: Span) -> Self {
        Self {
            anchor,
            object_name: None,
            field_name: None,
            field_type: None,
            simple_type: SimpleType::Unknown,
            parent: None,
            references: None,
            operations: Vec::new(),
            span,
        }
    }

    /// Name used by children when they need an owner name.
    pub fn display_name(&self) -> Option<&str> {
        self.field_name.as_deref().or(self.object_name.as_deref())
    }

    fn absorb(&mut self, other: Schema) {
        fill(&mut self.object_name, other.object_name);
        fill(&mut self.field_name, other.field_name);
        fill(&mut self.field_type, other.field_type);
        fill(&mut self.parent, other.parent);
        fill(&mut self.references, other.references);
        if self.simple_type == SimpleType::Unknown {
            self.simple_type = other.simple_type;
        }
        for op in other.operations {
            push_unique(&mut self.operations, op);
        }
    }
}

/// An HTTP operation declared under `paths:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub anchor: NodeId,
    pub path: String,
    pub method: String,
    pub operation_id: Option<String>,
    /// Anchors of parameters, path-level ones first.
    pub parameters: Vec<NodeId>,
    /// Anchors of component schemas referenced inside the operation.
    pub referenced_schemas: Vec<NodeId>,
    pub span: Span,
}

impl Operation {
    fn absorb(&mut self, other: Operation) {
        fill(&mut self.operation_id, other.operation_id);
        for p in other.parameters {
            push_unique(&mut self.parameters, p);
        }
        for s in other.referenced_schemas {
            push_unique(&mut self.referenced_schemas, s);
        }
    }
}

/// A parameter mapping holding `name:` and `schema:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub anchor: NodeId,
    pub name: String,
    /// Value of `in:` (`path`, `query`, `header`, `cookie`).
    pub location: Option<String>,
    /// Anchor of the schema built from the `schema:` block.
    pub schema: NodeId,
    /// Component schema the parameter schema refers to, if any.
    pub schema_ref: Option<NodeId>,
}

impl Parameter {
    fn absorb(&mut self, other: Parameter) {
        fill(&mut self.location, other.location);
        fill(&mut self.schema_ref, other.schema_ref);
    }
}

/// Entities of one document keyed by anchor identity, plus name indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityMap {
    pub schemas: BTreeMap<NodeId, Schema>,
    pub operations: BTreeMap<NodeId, Operation>,
    pub parameters: BTreeMap<NodeId, Parameter>,
    /// Component schema name (and `#/components/schemas/Name`) to anchor.
    pub schema_names: BTreeMap<String, NodeId>,
    /// Component parameter name (and `#/components/parameters/Name`) to anchor.
    pub parameter_names: BTreeMap<String, NodeId>,
    /// Method mapping anchor to its `operationId`.
    pub operation_ids: BTreeMap<NodeId, String>,
    /// `operationId` to method mapping anchor.
    pub operation_names: BTreeMap<String, NodeId>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.operations.is_empty() && self.parameters.is_empty()
    }

    /// Insert or extend. Returns true when the anchor was new.
    pub fn upsert_schema(&mut self, schema: Schema) -> bool {
        match self.schemas.get_mut(&schema.anchor) {
            Some(existing) => {
                existing.absorb(schema);
                false
            }
            None => {
                self.schemas.insert(schema.anchor, schema);
                true
            }
        }
    }

    pub fn upsert_operation(&mut self, operation: Operation) -> bool {
        match self.operations.get_mut(&operation.anchor) {
            Some(existing) => {
                existing.absorb(operation);
                false
            }
            None => {
                self.operations.insert(operation.anchor, operation);
                true
            }
        }
    }

    pub fn upsert_parameter(&mut self, parameter: Parameter) -> bool {
        match self.parameters.get_mut(&parameter.anchor) {
            Some(existing) => {
                existing.absorb(parameter);
                false
            }
            None => {
                self.parameters.insert(parameter.anchor, parameter);
                true
            }
        }
    }

    /// Register a component schema name. The first registration stands.
    pub fn register_schema_name(&mut self, name: &str, anchor: NodeId) {
        self.schema_names.entry(name.to_string()).or_insert(anchor);
        self.schema_names
            .entry(format!("{COMPONENT_SCHEMA_PREFIX}{name}"))
            .or_insert(anchor);
    }

    /// Register a component parameter name. The first registration stands.
    pub fn register_parameter_name(&mut self, name: &str, anchor: NodeId) {
        self.parameter_names.entry(name.to_string()).or_insert(anchor);
        self.parameter_names
            .entry(format!("{COMPONENT_PARAMETER_PREFIX}{name}"))
            .or_insert(anchor);
    }

    /// Resolve a parameter name or local `$ref` to its anchor. Exact match only.
    pub fn parameter_anchor(&self, name_or_ref: &str) -> Option<NodeId> {
        self.parameter_names.get(name_or_ref).copied()
    }

    pub fn resolve_parameter(&self, name_or_ref: &str) -> Option<&Parameter> {
        self.parameters.get(&self.parameter_anchor(name_or_ref)?)
    }

    /// Record an `operationId` for a method mapping. First writer wins on
    /// both sides of the index.
    pub fn register_operation_id(&mut self, anchor: NodeId, operation_id: &str) {
        self.operation_ids
            .entry(anchor)
            .or_insert_with(|| operation_id.to_string());
        self.operation_names
            .entry(operation_id.to_string())
            .or_insert(anchor);
    }

    /// Resolve a schema name or local `$ref` to its anchor. Exact match only.
    pub fn schema_anchor(&self, name_or_ref: &str) -> Option<NodeId> {
        self.schema_names.get(name_or_ref).copied()
    }

    /// Name → identity → entity.
    pub fn resolve_schema(&self, name_or_ref: &str) -> Option<&Schema> {
        self.schemas.get(&self.schema_anchor(name_or_ref)?)
    }

    pub fn resolve_operation(&self, operation_id: &str) -> Option<&Operation> {
        self.operations.get(self.operation_names.get(operation_id)?)
    }

    /// Append `operation` to a schema's links.
    pub fn link_schema_operation(&mut self, schema: NodeId, operation: NodeId) {
        if let Some(s) = self.schemas.get_mut(&schema) {
            push_unique(&mut s.operations, operation);
        }
    }

    /// Append `schema` to an operation's referenced schemas.
    pub fn link_operation_schema(&mut self, operation: NodeId, schema: NodeId) {
        if let Some(op) = self.operations.get_mut(&operation) {
            push_unique(&mut op.referenced_schemas, schema);
        }
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

pub(crate) fn push_unique(list: &mut Vec<NodeId>, id: NodeId) {
    if !list.contains(&id) {
        list.push(id);
    }
}
