//! Compiled tree-sitter queries.

use glean_core::errors::QueryError;
use tree_sitter::{Node, Query, QueryCursor, QueryErrorKind};

use super::capture::CaptureSets;

/// A tree-sitter query compiled for one grammar.
///
/// Immutable after construction; share it by reference across files and
/// threads. Matching state lives in the caller's `QueryCursor`.
#[derive(Debug)]
pub struct CompiledQuery {
    name: String,
    query: Query,
}

impl CompiledQuery {
    /// Compile `source` for `language`.
    ///
    /// Fails on invalid syntax, unknown node types, fields or captures, and
    /// malformed predicates.
    pub fn compile(
        language: &tree_sitter::Language,
        name: &str,
        source: &str,
    ) -> Result<Self, QueryError> {
        let query = Query::new(language, source).map_err(|e| QueryError::Compile {
            name: name.to_string(),
            row: e.row,
            column: e.column,
            kind: kind_label(&e.kind).to_string(),
            message: e.message,
        })?;
        tracing::debug!(
            query = name,
            patterns = query.pattern_count(),
            captures = query.capture_names().len(),
            "compiled query"
        );
        Ok(Self {
            name: name.to_string(),
            query,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capture_names(&self) -> &[&str] {
        self.query.capture_names()
    }

    pub fn pattern_count(&self) -> usize {
        self.query.pattern_count()
    }

    /// Index of `capture`, or `MissingCapture` if the query never binds it.
    pub fn capture_index(&self, capture: &str) -> Result<u32, QueryError> {
        self.query
            .capture_index_for_name(capture)
            .ok_or_else(|| QueryError::MissingCapture {
                name: self.name.clone(),
                capture: capture.to_string(),
            })
    }

    /// Every match under `node`, in document order.
    ///
    /// Text predicates are checked against `source` as candidates are
    /// produced; failing candidates never surface. Calling again with a
    /// cursor restarts the sequence from the beginning.
    pub fn matches<'a, 'tree: 'a>(
        &'a self,
        cursor: &'a mut QueryCursor,
        node: Node<'tree>,
        source: &'a [u8],
    ) -> CaptureSets<'a, 'tree> {
        CaptureSets::new(self, cursor.matches(&self.query, node, source))
    }
}

fn kind_label(kind: &QueryErrorKind) -> &'static str {
    match kind {
        QueryErrorKind::Syntax => "syntax error",
        QueryErrorKind::NodeType => "unknown node type",
        QueryErrorKind::Field => "unknown field name",
        QueryErrorKind::Capture => "unknown capture name",
        QueryErrorKind::Predicate => "invalid predicate",
        QueryErrorKind::Structure => "invalid query structure",
        QueryErrorKind::Language => "language error",
    }
}
