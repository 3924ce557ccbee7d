//! Navigation helpers over tree-sitter-yaml trees.
//!
//! Shapes handled: block and flow mappings, block and flow sequences, and
//! plain, single-quoted and double-quoted scalars. Anything else reads as
//! "not a scalar" and callers skip it.

use tree_sitter::Node;

/// Keys that introduce an operation under a path item.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}

/// One key/value entry of a mapping.
#[derive(Debug, Clone, Copy)]
pub struct Pair<'tree> {
    pub node: Node<'tree>,
    pub key_node: Node<'tree>,
    /// `None` for `key:` with nothing after it.
    pub value: Option<Node<'tree>>,
}

/// Unquoted value of a scalar node, or of the scalar inside a `flow_node`.
pub fn scalar_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    let scalar = match node.kind() {
        "flow_node" => {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .filter(|c| is_scalar_kind(c.kind()))
                .last();
            found?
        }
        kind if is_scalar_kind(kind) => node,
        _ => return None,
    };
    let text = scalar.utf8_text(source).ok()?;
    match scalar.kind() {
        "double_quote_scalar" => Some(unescape_double(strip_quotes(text, '"'))),
        "single_quote_scalar" => Some(strip_quotes(text, '\'').replace("''", "'")),
        _ => Some(text.trim().to_string()),
    }
}

fn is_scalar_kind(kind: &str) -> bool {
    matches!(kind, "plain_scalar" | "double_quote_scalar" | "single_quote_scalar")
}

fn strip_quotes(text: &str, quote: char) -> &str {
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

fn unescape_double(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The mapping held by a node, looking through `block_node` / `flow_node`.
pub fn mapping_of(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "block_mapping" | "flow_mapping" => Some(node),
        "block_node" | "flow_node" => {
            let mut cursor = node.walk();
            let found = node
                .named_children(&mut cursor)
                .find(|c| matches!(c.kind(), "block_mapping" | "flow_mapping"));
            found
        }
        _ => None,
    }
}

/// Top-level mapping of the first document in a stream.
pub fn document_mapping(stream: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = stream.walk();
    let document = stream
        .named_children(&mut cursor)
        .find(|c| c.kind() == "document")?;
    let mut cursor = document.walk();
    let found = document.named_children(&mut cursor).find_map(mapping_of);
    found
}

/// Entries of a mapping in document order.
pub fn pairs(mapping: Node<'_>) -> Vec<Pair<'_>> {
    let mut cursor = mapping.walk();
    let entries: Vec<Pair<'_>> = mapping
        .named_children(&mut cursor)
        .filter(|c| matches!(c.kind(), "block_mapping_pair" | "flow_pair"))
        .filter_map(|pair| {
            Some(Pair {
                node: pair,
                key_node: pair.child_by_field_name("key")?,
                value: pair.child_by_field_name("value"),
            })
        })
        .collect();
    entries
}

/// Scalar key of a pair.
pub fn key_of(pair: &Pair<'_>, source: &[u8]) -> Option<String> {
    scalar_value(pair.key_node, source)
}

/// Value node stored under `key` in `mapping`.
pub fn lookup<'tree>(mapping: Node<'tree>, key: &str, source: &[u8]) -> Option<Node<'tree>> {
    pairs(mapping)
        .into_iter()
        .find(|p| key_of(p, source).as_deref() == Some(key))
        .and_then(|p| p.value)
}

/// Scalar stored under `key` in `mapping`.
pub fn lookup_scalar(mapping: Node<'_>, key: &str, source: &[u8]) -> Option<String> {
    scalar_value(lookup(mapping, key, source)?, source)
}

/// Content nodes of a block or flow sequence value.
pub fn sequence_items(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let seq = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "block_sequence" | "flow_sequence"));
    let Some(seq) = seq else {
        return Vec::new();
    };

    let mut cursor = seq.walk();
    let children: Vec<Node<'_>> = seq.named_children(&mut cursor).collect();
    if seq.kind() == "flow_sequence" {
        return children;
    }
    children
        .into_iter()
        .filter(|item| item.kind() == "block_sequence_item")
        .filter_map(|item| {
            let mut cursor = item.walk();
            let content = item
                .named_children(&mut cursor)
                .find(|c| matches!(c.kind(), "block_node" | "flow_node"));
            content
        })
        .collect()
}

/// The pair whose value holds `node`, looking through node wrappers.
/// `None` at document level or inside sequences.
pub fn owner_pair(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent()?;
    loop {
        match current.kind() {
            "block_node" | "flow_node" => current = current.parent()?,
            "block_mapping_pair" | "flow_pair" => return Some(current),
            _ => return None,
        }
    }
}

/// Key of the pair owning the mapping that contains `pair`.
pub fn parent_key(pair: Node<'_>, source: &[u8]) -> Option<String> {
    let mapping = pair.parent()?;
    let owner = owner_pair(mapping)?;
    scalar_value(owner.child_by_field_name("key")?, source)
}

/// Key of the pair that owns `node` directly.
pub fn owner_key(node: Node<'_>, source: &[u8]) -> Option<String> {
    let owner = owner_pair(node)?;
    scalar_value(owner.child_by_field_name("key")?, source)
}
