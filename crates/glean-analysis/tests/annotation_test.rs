//! Annotation pipeline tests over OpenAPI v3 YAML documents.

use std::path::{Path, PathBuf};

use glean_analysis::annotation::{
    AnnotationPipeline, EntityMap, PassContext, Schema, SimpleType, Span,
};
use glean_analysis::identity::NodeIdMap;
use glean_analysis::parsers::ParserManager;
use glean_analysis::scanner::Language;
use glean_core::errors::AnnotationError;
use glean_core::types::identifiers::SequentialIdGenerator;
use tree_sitter::{Point, Tree};

fn fixture_path(relative: &str) -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/glean-analysis/; fixtures live at the repo root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../test-fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture_path(relative)).unwrap()
}

fn parse(src: &str) -> Tree {
    ParserManager::new()
        .parse_strict(src.as_bytes(), Path::new("api.yaml"), Language::Yaml)
        .unwrap()
        .tree()
        .clone()
}

fn annotate(src: &str) -> EntityMap {
    let tree = parse(src);
    let ids = NodeIdMap::annotate(&tree, &SequentialIdGenerator::new());
    let ctx = PassContext::new(&tree, src.as_bytes(), &ids);
    AnnotationPipeline::openapi_v3()
        .unwrap()
        .run(&ctx, EntityMap::new())
        .unwrap()
}

fn field<'e>(entities: &'e EntityMap, object: &str, name: &str) -> &'e Schema {
    let found: Vec<_> = entities
        .schemas
        .values()
        .filter(|s| s.object_name.as_deref() == Some(object) && s.field_name.as_deref() == Some(name))
        .collect();
    assert_eq!(found.len(), 1, "expected one {object}.{name}, got {found:?}");
    found[0]
}

const SEARCH: &str = "\
openapi: 3.0.0
paths:
  /search:
    get:
      operationId: search
      parameters:
        - name: filter
          in: query
          schema:
            type: object
            properties:
              term:
                type: string
";

#[test]
fn parameter_schema_is_anchored_at_the_schema_value() {
    let tree = parse(SEARCH);
    let ids = NodeIdMap::annotate(&tree, &SequentialIdGenerator::new());
    let ctx = PassContext::new(&tree, SEARCH.as_bytes(), &ids);
    let entities = AnnotationPipeline::openapi_v3()
        .unwrap()
        .run(&ctx, EntityMap::new())
        .unwrap();

    let schema_value = ids
        .iter()
        .find(|r| r.kind == "block_mapping" && r.start == Point { row: 9, column: 12 })
        .map(|r| r.id)
        .unwrap();
    let param_mapping = ids
        .iter()
        .find(|r| r.kind == "block_mapping" && r.start == Point { row: 6, column: 10 })
        .map(|r| r.id)
        .unwrap();

    let filters: Vec<_> = entities
        .schemas
        .values()
        .filter(|s| s.field_name.as_deref() == Some("filter"))
        .collect();
    assert_eq!(filters.len(), 1);
    let filter = filters[0];
    assert_eq!(filter.anchor, schema_value);
    assert_eq!(filter.simple_type, SimpleType::Object);
    assert_eq!(filter.field_type.as_deref(), Some("object"));
    assert_eq!(filter.object_name.as_deref(), Some("search"));

    assert_eq!(entities.parameters.len(), 1);
    let param = &entities.parameters[&param_mapping];
    assert_eq!(param.name, "filter");
    assert_eq!(param.schema, schema_value);
    assert_eq!(param.location.as_deref(), Some("query"));
    assert_eq!(param.schema_ref, None);

    let term = field(&entities, "filter", "term");
    assert_eq!(term.parent, Some(schema_value));
    assert_eq!(term.simple_type, SimpleType::String);

    let op = entities.resolve_operation("search").unwrap();
    assert_eq!(op.path, "/search");
    assert_eq!(op.method, "get");
    assert_eq!(op.parameters, vec![param_mapping]);
    assert!(filter.operations.contains(&op.anchor));
    assert!(term.operations.contains(&op.anchor));
}

#[test]
fn petstore_entities_are_linked() {
    let src = read_fixture("openapi/petstore.yaml");
    let entities = annotate(&src);

    assert_eq!(entities.schemas.len(), 12);
    assert_eq!(entities.operations.len(), 3);
    assert_eq!(entities.parameters.len(), 2);

    let pet = entities.resolve_schema("Pet").unwrap();
    assert_eq!(pet.object_name.as_deref(), Some("Pet"));
    assert_eq!(pet.field_name, None);
    assert_eq!(pet.simple_type, SimpleType::Object);
    assert_eq!(
        pet.span,
        Span { start_line: 55, start_column: 5, end_line: 55, end_column: 8 }
    );
    let owner = entities.resolve_schema("#/components/schemas/Owner").unwrap();
    let pets = entities.resolve_schema("Pets").unwrap();
    assert_eq!(pets.simple_type, SimpleType::Array);

    let owner_field = field(&entities, "Pet", "owner");
    assert_eq!(owner_field.parent, Some(pet.anchor));
    assert_eq!(owner_field.references, Some(owner.anchor));
    assert_eq!(owner_field.simple_type, SimpleType::Object);
    assert_eq!(owner_field.field_type.as_deref(), Some("#/components/schemas/Owner"));

    let born = field(&entities, "Pet", "born");
    assert_eq!(born.simple_type, SimpleType::Date);
    assert_eq!(
        born.span,
        Span { start_line: 68, start_column: 9, end_line: 68, end_column: 13 }
    );
    assert_eq!(field(&entities, "Pet", "id").simple_type, SimpleType::Number);
    assert_eq!(field(&entities, "Owner", "email").simple_type, SimpleType::String);

    let list = entities.resolve_operation("listPets").unwrap();
    assert_eq!((list.path.as_str(), list.method.as_str()), ("/pets", "get"));
    assert_eq!(list.referenced_schemas, vec![pets.anchor]);
    assert!(pets.operations.contains(&list.anchor));

    let limit = field(&entities, "listPets", "limit");
    assert_eq!(limit.simple_type, SimpleType::Number);
    assert_eq!(
        limit.span,
        Span { start_line: 10, start_column: 17, end_line: 10, end_column: 22 }
    );
    assert!(limit.operations.contains(&list.anchor));
    assert_eq!(list.parameters.len(), 1);
    assert_eq!(entities.parameters[&list.parameters[0]].name, "limit");

    let create = entities.resolve_operation("createPet").unwrap();
    assert_eq!(create.method, "post");
    for name in ["name", "tag"] {
        let f = field(&entities, "createPet", name);
        assert_eq!(f.parent, None);
        assert!(f.operations.contains(&create.anchor));
    }

    let show = entities.resolve_operation("showPetById").unwrap();
    assert_eq!(show.path, "/pets/{petId}");
    assert_eq!(show.referenced_schemas, vec![pet.anchor]);
    assert!(pet.operations.contains(&show.anchor));
    assert_eq!(show.parameters.len(), 1);
    let pet_id = &entities.parameters[&show.parameters[0]];
    assert_eq!(pet_id.name, "petId");
    assert_eq!(pet_id.location.as_deref(), Some("path"));
    assert!(entities.schemas[&pet_id.schema].operations.contains(&show.anchor));

    // `$ref`s outside operations link nothing
    assert!(owner.operations.is_empty());
}

#[test]
fn flow_style_documents_are_annotated() {
    let src = read_fixture("openapi/flow_style.yaml");
    let entities = annotate(&src);

    let status = entities.resolve_schema("Status").unwrap();
    assert_eq!(status.simple_type, SimpleType::Object);
    let up = field(&entities, "Status", "up");
    assert_eq!(up.simple_type, SimpleType::Boolean);
    assert_eq!(up.parent, Some(status.anchor));
    assert_eq!(field(&entities, "Status", "checked").simple_type, SimpleType::Date);

    let health = entities.resolve_operation("health").unwrap();
    assert_eq!(health.referenced_schemas, vec![status.anchor]);
    assert!(status.operations.contains(&health.anchor));
}

#[test]
fn component_parameters_resolve_through_refs() {
    let src = "\
openapi: 3.0.0
components:
  parameters:
    Limit:
      name: limit
      in: query
      schema:
        $ref: '#/components/schemas/PageSize'
  schemas:
    PageSize:
      type: integer
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - $ref: '#/components/parameters/Limit'
    post:
      operationId: createPet
      parameters:
        - $ref: '#/components/parameters/Missing'
";
    let entities = annotate(src);
    assert_eq!(entities.parameters.len(), 1);

    let limit = entities.resolve_parameter("#/components/parameters/Limit").unwrap();
    assert_eq!(limit.name, "limit");
    assert_eq!(limit.location.as_deref(), Some("query"));
    let page_size = entities.resolve_schema("PageSize").unwrap();
    assert_eq!(limit.schema_ref, Some(page_size.anchor));

    let list = entities.resolve_operation("listPets").unwrap();
    assert_eq!(list.parameters, vec![limit.anchor]);
    assert_eq!(list.referenced_schemas, vec![page_size.anchor]);
    assert!(page_size.operations.contains(&list.anchor));

    let limit_schema = field(&entities, "listPets", "limit");
    assert_eq!(limit_schema.anchor, limit.schema);
    assert_eq!(limit_schema.operations, vec![list.anchor]);

    let create = entities.resolve_operation("createPet").unwrap();
    assert!(create.parameters.is_empty());
    assert!(!limit_schema.operations.contains(&create.anchor));
}

#[test]
fn parameters_match_flow_style_and_any_key_order() {
    let src = "\
openapi: 3.0.0
paths:
  /pets/{petId}:
    get:
      operationId: showPetById
      parameters:
        - {name: petId, in: path, schema: {type: string}}
        - schema:
            type: integer
            format: int32
          in: query
          name: depth
";
    let entities = annotate(src);
    assert_eq!(entities.parameters.len(), 2);

    let show = entities.resolve_operation("showPetById").unwrap();
    let names: Vec<&str> = show
        .parameters
        .iter()
        .map(|p| entities.parameters[p].name.as_str())
        .collect();
    assert_eq!(names, vec!["petId", "depth"]);

    let pet_id = &entities.parameters[&show.parameters[0]];
    assert_eq!(pet_id.location.as_deref(), Some("path"));
    let pet_id_schema = field(&entities, "showPetById", "petId");
    assert_eq!(pet_id_schema.anchor, pet_id.schema);
    assert_eq!(pet_id_schema.simple_type, SimpleType::String);

    let depth = &entities.parameters[&show.parameters[1]];
    assert_eq!(depth.location.as_deref(), Some("query"));
    let depth_schema = field(&entities, "showPetById", "depth");
    assert_eq!(depth_schema.anchor, depth.schema);
    assert_eq!(depth_schema.simple_type, SimpleType::Number);
    assert_eq!(depth_schema.field_type.as_deref(), Some("integer"));
    assert!(depth_schema.operations.contains(&show.anchor));
}

#[test]
fn running_twice_equals_running_once() {
    let src = read_fixture("openapi/petstore.yaml");
    let tree = parse(&src);
    let ids = NodeIdMap::annotate(&tree, &SequentialIdGenerator::new());
    let ctx = PassContext::new(&tree, src.as_bytes(), &ids);
    let pipeline = AnnotationPipeline::openapi_v3().unwrap();

    let once = pipeline.run(&ctx, EntityMap::new()).unwrap();
    let twice = pipeline.run(&ctx, once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn operation_id_outside_an_operation_is_ignored() {
    let src = "\
openapi: 3.0.0
components:
  links:
    GetUser:
      operationId: getUser
";
    let entities = annotate(src);
    assert!(entities.operation_ids.is_empty());
    assert!(entities.is_empty());
}

#[test]
fn unresolved_refs_are_skipped() {
    let src = "\
openapi: 3.0.0
paths:
  /x:
    get:
      operationId: getX
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Missing'
";
    let entities = annotate(src);
    let op = entities.resolve_operation("getX").unwrap();
    assert!(op.referenced_schemas.is_empty());
}

#[test]
fn missing_tree_fails_the_first_pass() {
    let ids = NodeIdMap::empty();
    let ctx = PassContext::without_tree(b"openapi: 3.0.0\n", &ids);
    let err = AnnotationPipeline::openapi_v3()
        .unwrap()
        .run(&ctx, EntityMap::new())
        .unwrap_err();
    assert!(matches!(err, AnnotationError::MissingTree { pass: "component_schemas" }));
}

#[test]
fn passes_run_in_declared_order() {
    let pipeline = AnnotationPipeline::openapi_v3().unwrap();
    assert_eq!(
        pipeline.pass_names(),
        vec!["component_schemas", "parameters", "operation_ids", "objects", "paths", "references"]
    );
}
