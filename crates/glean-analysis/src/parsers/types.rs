//! Parsed tree ownership.

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

use crate::scanner::language_detect::Language;

/// An owned syntax tree for one file.
///
/// Every `Node` borrowed from it is tied to its lifetime; dropping the
/// `ParsedTree` releases the tree and all of its nodes.
#[derive(Debug)]
pub struct ParsedTree {
    tree: Tree,
    language: Language,
    path: PathBuf,
}

/// First ERROR or MISSING node found in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    pub kind: String,
}

impl ParsedTree {
    pub(crate) fn new(tree: Tree, language: Language, path: &Path) -> Self {
        Self {
            tree,
            language,
            path: path.to_path_buf(),
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_error(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Locate the first syntax problem, descending only into subtrees that
    /// contain one.
    pub fn first_issue(&self) -> Option<SyntaxIssue> {
        let mut node = self.tree.root_node();
        if !node.has_error() {
            return None;
        }
        'descend: loop {
            if node.is_error() || node.is_missing() {
                let pos = node.start_position();
                let kind = if node.is_missing() {
                    format!("missing {}", node.kind())
                } else {
                    "unexpected input".to_string()
                };
                return Some(SyntaxIssue {
                    line: pos.row as u32 + 1,
                    column: pos.column as u32 + 1,
                    kind,
                });
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.has_error() || child.is_missing() {
                    node = child;
                    continue 'descend;
                }
            }
            // has_error with no offending child: report the node itself.
            let pos = node.start_position();
            return Some(SyntaxIssue {
                line: pos.row as u32 + 1,
                column: pos.column as u32 + 1,
                kind: node.kind().to_string(),
            });
        }
    }
}
