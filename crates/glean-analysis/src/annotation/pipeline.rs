//! Ordered annotation pipeline.
//!
//! Each pass is a function `(ctx, state) -> state`. The pipeline folds the
//! entity map through its passes in declared order; later passes may rely
//! on entities built by earlier ones.

use glean_core::errors::{AnnotationError, QueryError};
use glean_core::types::identifiers::NodeId;
use tree_sitter::{Node, Tree};

use super::model::{EntityMap, Span};
use super::openapi;
use crate::identity::NodeIdMap;

/// Read-only inputs shared by every pass over one file.
pub struct PassContext<'a, 'tree> {
    pub tree: Option<&'tree Tree>,
    pub source: &'a [u8],
    pub ids: &'a NodeIdMap<'tree>,
}

impl<'a, 'tree> PassContext<'a, 'tree> {
    pub fn new(tree: &'tree Tree, source: &'a [u8], ids: &'a NodeIdMap<'tree>) -> Self {
        Self {
            tree: Some(tree),
            source,
            ids,
        }
    }

    /// Context for a file whose tree could not be produced.
    pub fn without_tree(source: &'a [u8], ids: &'a NodeIdMap<'tree>) -> Self {
        Self {
            tree: None,
            source,
            ids,
        }
    }

    /// Root of the tree, or `MissingTree` naming the pass that needed it.
    pub fn root(&self, pass: &'static str) -> Result<Node<'tree>, AnnotationError> {
        self.tree
            .map(|t| t.root_node())
            .ok_or(AnnotationError::MissingTree { pass })
    }

    /// Identity of a node. Nodes outside the annotated tree have none.
    pub fn id(&self, node: Node<'_>) -> Option<NodeId> {
        self.ids.identity_of(node)
    }

    pub fn span(&self, node: Node<'_>) -> Span {
        Span::of(node)
    }

    /// Nearest ancestor of `id` (exclusive) accepted by `pred`.
    pub fn nearest_ancestor(&self, id: NodeId, pred: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        self.ids.ancestors(id).find(|a| pred(*a))
    }
}

/// One step of the pipeline.
pub trait AnnotationPass: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, ctx: &PassContext<'_, '_>, state: EntityMap) -> Result<EntityMap, AnnotationError>;
}

/// Passes in a fixed order.
pub struct AnnotationPipeline {
    passes: Vec<Box<dyn AnnotationPass>>,
}

impl AnnotationPipeline {
    pub fn new(passes: Vec<Box<dyn AnnotationPass>>) -> Self {
        Self { passes }
    }

    /// The OpenAPI v3 YAML passes, queries compiled once here.
    pub fn openapi_v3() -> Result<Self, QueryError> {
        Ok(Self::new(openapi::passes()?))
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Fold `state` through every pass. The first fatal error stops the file.
    pub fn run(&self, ctx: &PassContext<'_, '_>, state: EntityMap) -> Result<EntityMap, AnnotationError> {
        self.passes.iter().try_fold(state, |state, pass| {
            let _span = tracing::debug_span!("annotation_pass", pass = pass.name()).entered();
            let before = (state.schemas.len(), state.operations.len(), state.parameters.len());
            let state = pass.run(ctx, state)?;
            tracing::debug!(
                schemas_added = state.schemas.len().saturating_sub(before.0),
                operations_added = state.operations.len().saturating_sub(before.1),
                parameters_added = state.parameters.len().saturating_sub(before.2),
                "pass complete"
            );
            Ok(state)
        })
    }
}
