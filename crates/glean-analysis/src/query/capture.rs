//! Capture sets produced by query matches.

use smallvec::SmallVec;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, QueryMatches};

use super::compiled::CompiledQuery;
use crate::annotation::yaml;

/// Bindings of one successful match.
#[derive(Debug, Clone)]
pub struct CaptureSet<'a, 'tree> {
    names: &'a [&'a str],
    pattern_index: usize,
    captures: SmallVec<[(u32, Node<'tree>); 4]>,
}

impl<'a, 'tree> CaptureSet<'a, 'tree> {
    /// First node bound to `name`.
    pub fn get(&self, name: &str) -> Option<Node<'tree>> {
        self.all(name).next()
    }

    /// Every node bound to `name`, in capture order.
    pub fn all<'s>(&'s self, name: &'s str) -> impl Iterator<Item = Node<'tree>> + 's {
        self.captures
            .iter()
            .filter(move |(idx, _)| self.names.get(*idx as usize) == Some(&name))
            .map(|(_, node)| *node)
    }

    /// Raw source text of the first node bound to `name`.
    pub fn text<'s>(&self, name: &str, source: &'s [u8]) -> Option<&'s str> {
        self.get(name)?.utf8_text(source).ok()
    }

    /// Unquoted scalar value of the first node bound to `name`.
    pub fn scalar(&self, name: &str, source: &[u8]) -> Option<String> {
        yaml::scalar_value(self.get(name)?, source)
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// `(capture name, node)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Node<'tree>)> + '_ {
        self.captures
            .iter()
            .filter_map(|(idx, node)| self.names.get(*idx as usize).map(|n| (*n, *node)))
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

/// Lazy sequence of capture sets over one tree.
pub struct CaptureSets<'a, 'tree: 'a> {
    names: &'a [&'a str],
    inner: QueryMatches<'a, 'tree, &'a [u8], &'a [u8]>,
}

impl<'a, 'tree: 'a> CaptureSets<'a, 'tree> {
    pub(super) fn new(
        query: &'a CompiledQuery,
        inner: QueryMatches<'a, 'tree, &'a [u8], &'a [u8]>,
    ) -> Self {
        Self {
            names: query.capture_names(),
            inner,
        }
    }
}

impl<'a, 'tree: 'a> Iterator for CaptureSets<'a, 'tree> {
    type Item = CaptureSet<'a, 'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.inner.next()?;
        Some(CaptureSet {
            names: self.names,
            pattern_index: m.pattern_index,
            captures: m.captures.iter().map(|c| (c.index, c.node)).collect(),
        })
    }
}
