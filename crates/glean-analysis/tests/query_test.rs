//! Structural query tests: compile errors, predicates, capture access and
//! order stability across reruns.

use std::path::Path;

use glean_analysis::parsers::ParserManager;
use glean_analysis::query::CompiledQuery;
use glean_analysis::scanner::Language;
use glean_core::errors::QueryError;
use tree_sitter::{QueryCursor, Tree};

const SRC: &str = "name: a\nother: b\nnested:\n  name: 'c'\n  list: [name, x]\n";

fn parse(src: &str) -> Tree {
    ParserManager::new()
        .parse_with_language(src.as_bytes(), Path::new("q.yaml"), Language::Yaml)
        .unwrap()
        .tree()
        .clone()
}

fn compile(name: &str, src: &str) -> Result<CompiledQuery, QueryError> {
    CompiledQuery::compile(&Language::Yaml.ts_language(), name, src)
}

const NAME_PAIRS: &str = r#"
(block_mapping_pair
  key: (flow_node) @key
  (#eq? @key "name")
  value: (flow_node) @value) @pair
"#;

#[test]
fn syntax_error_names_the_query() {
    let err = compile("broken", "(block_mapping_pair").unwrap_err();
    match err {
        QueryError::Compile { name, .. } => assert_eq!(name, "broken"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_node_type_is_reported() {
    let err = compile("unknown", "(no_such_node) @x").unwrap_err();
    match err {
        QueryError::Compile { kind, .. } => assert_eq!(kind, "unknown node type"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_capture_is_an_error() {
    let query = compile("pairs", NAME_PAIRS).unwrap();
    assert_eq!(query.pattern_count(), 1);
    assert!(query.capture_index("value").is_ok());
    assert!(matches!(
        query.capture_index("nope"),
        Err(QueryError::MissingCapture { ref capture, .. }) if capture == "nope"
    ));
}

#[test]
fn predicates_filter_candidates() {
    let tree = parse(SRC);
    let query = compile("pairs", NAME_PAIRS).unwrap();
    let mut cursor = QueryCursor::new();

    let values: Vec<String> = query
        .matches(&mut cursor, tree.root_node(), SRC.as_bytes())
        .filter_map(|m| m.scalar("value", SRC.as_bytes()))
        .collect();
    assert_eq!(values, vec!["a".to_string(), "c".to_string()]);
}

#[test]
fn match_predicate_uses_regex() {
    let tree = parse(SRC);
    let query = compile(
        "regex",
        r#"(block_mapping_pair key: (flow_node) @key (#match? @key "^(name|other)$"))"#,
    )
    .unwrap();
    let mut cursor = QueryCursor::new();
    let keys: Vec<&str> = query
        .matches(&mut cursor, tree.root_node(), SRC.as_bytes())
        .filter_map(|m| m.text("key", SRC.as_bytes()))
        .collect();
    assert_eq!(keys, vec!["name", "other", "name"]);
}

#[test]
fn capture_set_accessors() {
    let tree = parse(SRC);
    let query = compile("pairs", NAME_PAIRS).unwrap();
    let mut cursor = QueryCursor::new();
    let sets: Vec<_> = query
        .matches(&mut cursor, tree.root_node(), SRC.as_bytes())
        .collect();

    let nested = &sets[1];
    assert_eq!(nested.len(), 3);
    assert!(!nested.is_empty());
    assert_eq!(nested.pattern_index(), 0);
    assert_eq!(nested.text("value", SRC.as_bytes()), Some("'c'"));
    assert_eq!(nested.scalar("value", SRC.as_bytes()).as_deref(), Some("c"));
    assert_eq!(nested.get("missing"), None);
    let names: Vec<&str> = nested.iter().map(|(name, _)| name).collect();
    assert!(names.contains(&"pair"));
    assert!(names.contains(&"key"));
    assert!(names.contains(&"value"));
}

#[test]
fn reruns_are_order_stable() {
    let tree = parse(SRC);
    let query = compile(
        "two",
        r#"
        (block_mapping_pair key: (flow_node) @key)
        (flow_sequence (flow_node) @item)
        "#,
    )
    .unwrap();

    let snapshot = |cursor: &mut QueryCursor| -> Vec<(usize, Vec<(String, usize)>)> {
        query
            .matches(cursor, tree.root_node(), SRC.as_bytes())
            .map(|m| {
                let captures = m
                    .iter()
                    .map(|(name, node)| (name.to_string(), node.start_byte()))
                    .collect();
                (m.pattern_index(), captures)
            })
            .collect()
    };

    let mut cursor = QueryCursor::new();
    let first = snapshot(&mut cursor);
    let second = snapshot(&mut cursor);
    let third = snapshot(&mut QueryCursor::new());
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn matching_can_start_below_the_root() {
    let tree = parse(SRC);
    let query = compile("pairs", NAME_PAIRS).unwrap();
    let mut cursor = QueryCursor::new();

    let nested = query
        .matches(&mut cursor, tree.root_node(), SRC.as_bytes())
        .nth(1)
        .and_then(|m| m.get("pair"))
        .and_then(|pair| pair.parent())
        .unwrap();
    let within: Vec<String> = query
        .matches(&mut cursor, nested, SRC.as_bytes())
        .filter_map(|m| m.scalar("value", SRC.as_bytes()))
        .collect();
    assert_eq!(within, vec!["c".to_string()]);
}
