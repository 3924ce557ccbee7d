//! `NodeIdMap`: one eager pre-order walk assigns a `NodeId` to every node.
//!
//! Lookups are keyed by tree-sitter's tree-relative node id, never by text,
//! so capture sets produced by different queries over the same tree can be
//! correlated by identity. Ids come from a shared generator and are strictly
//! increasing in document order within one map, which makes subtree
//! membership an interval check: `d` is under `a` iff
//! `a.id < d.id <= a.last_descendant`.

use glean_core::types::collections::FxHashMap;
use glean_core::types::identifiers::{NodeId, NodeIdGenerator};
use tree_sitter::{Node, Point, Tree};

/// Metadata recorded for each identified node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: &'static str,
    pub named: bool,
    pub parent: Option<NodeId>,
    /// Largest id inside this node's subtree (its own id for leaves).
    pub last_descendant: NodeId,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 0-based row/column.
    pub start: Point,
    pub end: Point,
}

/// Identity assignments for one parsed tree.
#[derive(Debug)]
pub struct NodeIdMap<'tree> {
    by_ts_id: FxHashMap<usize, usize>,
    by_node_id: FxHashMap<NodeId, usize>,
    nodes: Vec<Node<'tree>>,
    records: Vec<NodeRecord>,
}

impl<'tree> NodeIdMap<'tree> {
    /// The map of an absent tree.
    pub fn empty() -> Self {
        Self {
            by_ts_id: FxHashMap::default(),
            by_node_id: FxHashMap::default(),
            nodes: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Walk `tree` once in pre-order, naming every node (named and anonymous).
    pub fn annotate(tree: &'tree Tree, generator: &dyn NodeIdGenerator) -> Self {
        let mut map = Self::empty();
        let mut cursor = tree.walk();
        // indices of ancestors whose subtree is still open
        let mut open: Vec<usize> = Vec::new();

        loop {
            let node = cursor.node();
            let idx = map.push(node, open.last().copied(), generator.next_id());

            if cursor.goto_first_child() {
                open.push(idx);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    tracing::trace!(nodes = map.len(), "identity map built");
                    return map;
                }
                if let Some(closed) = open.pop() {
                    let last = map.records[map.records.len() - 1].id;
                    map.records[closed].last_descendant = last;
                }
            }
        }
    }

    fn push(&mut self, node: Node<'tree>, parent_idx: Option<usize>, id: NodeId) -> usize {
        let idx = self.records.len();
        self.records.push(NodeRecord {
            id,
            kind: node.kind(),
            named: node.is_named(),
            parent: parent_idx.map(|p| self.records[p].id),
            last_descendant: id,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start: node.start_position(),
            end: node.end_position(),
        });
        self.nodes.push(node);
        self.by_ts_id.insert(node.id(), idx);
        self.by_node_id.insert(id, idx);
        idx
    }

    /// Identity of `node`, or `None` if it does not belong to this map's tree.
    pub fn identity_of(&self, node: Node<'_>) -> Option<NodeId> {
        let idx = *self.by_ts_id.get(&node.id())?;
        let rec = &self.records[idx];
        // node ids are only unique per tree; confirm the span too
        (rec.start_byte == node.start_byte() && rec.end_byte == node.end_byte() && rec.kind == node.kind())
            .then_some(rec.id)
    }

    pub fn record(&self, id: NodeId) -> Option<&NodeRecord> {
        self.by_node_id.get(&id).map(|&i| &self.records[i])
    }

    /// The syntax node carrying `id`.
    pub fn node(&self, id: NodeId) -> Option<Node<'tree>> {
        self.by_node_id.get(&id).map(|&i| self.nodes[i])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id)?.parent
    }

    /// Ancestors of `id`, nearest first. Excludes `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Whether `descendant` lies strictly inside the subtree of `ancestor`.
    pub fn is_ancestor(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        match (self.record(ancestor), self.by_node_id.contains_key(&descendant)) {
            (Some(rec), true) => ancestor < descendant && descendant <= rec.last_descendant,
            _ => false,
        }
    }

    /// Records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glean_core::types::identifiers::SequentialIdGenerator;

    fn parse(src: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_yaml::LANGUAGE.into())
            .unwrap();
        parser.parse(src, None).unwrap()
    }

    #[test]
    fn every_node_gets_an_id() {
        let tree = parse("a: 1\nb: [x, y]\n");
        let gen = SequentialIdGenerator::new();
        let map = NodeIdMap::annotate(&tree, &gen);

        let mut count = 0;
        let mut cursor = tree.walk();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            count += 1;
            assert!(map.identity_of(node).is_some(), "unmapped {}", node.kind());
            for child in node.children(&mut cursor) {
                stack.push(child);
            }
        }
        assert_eq!(count, map.len());
        assert_eq!(gen.peek().get() - 1, map.len() as u64);
    }

    #[test]
    fn root_spans_all_ids() {
        let tree = parse("a:\n  b: c\n");
        let map = NodeIdMap::annotate(&tree, &SequentialIdGenerator::new());
        let root = map.identity_of(tree.root_node()).unwrap();
        let last = map.iter().last().unwrap().id;
        assert_eq!(map.record(root).unwrap().last_descendant, last);
        assert!(map.iter().skip(1).all(|r| map.is_ancestor(root, r.id)));
        assert!(!map.is_ancestor(root, root));
    }

    #[test]
    fn empty_map() {
        let map = NodeIdMap::empty();
        assert!(map.is_empty());
        assert_eq!(map.parent(NodeId(1)), None);
        assert!(!map.is_ancestor(NodeId(1), NodeId(2)));
    }
}
