//! Query sources for the OpenAPI v3 YAML passes.
//!
//! Key predicates accept plain or quoted keys.

/// `components: schemas: <mapping>`; the `components` parent is checked in code.
pub const COMPONENT_SCHEMAS: &str = r#"
(block_mapping_pair
  key: (flow_node) @schemas_key
  (#match? @schemas_key "^[\"']?schemas[\"']?$")
  value: (block_node (block_mapping) @schemas))
"#;

/// A block or flow mapping with a `name` key. `schema` is looked up in code
/// so key order does not matter.
pub const PARAMETERS: &str = r#"
(block_mapping
  (block_mapping_pair
    key: (flow_node) @name_key
    (#match? @name_key "^[\"']?name[\"']?$"))) @param

(flow_mapping
  (flow_pair
    key: (flow_node) @name_key
    (#match? @name_key "^[\"']?name[\"']?$"))) @param
"#;

/// `operationId: X`; the HTTP-method parent is checked in code.
pub const OPERATION_IDS: &str = r#"
(block_mapping_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?operationId[\"']?$")
  value: (flow_node) @operation_id) @pair
"#;

/// `properties: <mapping>` with a block or flow mapping value.
pub const OBJECTS: &str = r#"
(block_mapping_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?properties[\"']?$")
  value: (block_node (block_mapping) @properties))

(block_mapping_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?properties[\"']?$")
  value: (flow_node (flow_mapping) @properties))

(flow_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?properties[\"']?$")
  value: (flow_node (flow_mapping) @properties))
"#;

/// Top-level `paths: <mapping>`; the document-level position is checked in code.
pub const PATHS: &str = r#"
(block_mapping_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?paths[\"']?$")
  value: (block_node (block_mapping) @paths)) @pair
"#;

/// `$ref: target` in block or flow form.
pub const REFERENCES: &str = r#"
(block_mapping_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?\\$ref[\"']?$")
  value: (flow_node) @target) @pair

(flow_pair
  key: (flow_node) @key
  (#match? @key "^[\"']?\\$ref[\"']?$")
  value: (flow_node) @target) @pair
"#;
