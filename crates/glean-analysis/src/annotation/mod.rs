//! Annotation passes: build a cross-referenced entity model over a parsed
//! tree, keyed by node identity.

pub mod model;
pub mod openapi;
pub mod pipeline;
pub mod yaml;

pub use model::{EntityMap, Operation, Parameter, Schema, SimpleType, Span};
pub use pipeline::{AnnotationPass, AnnotationPipeline, PassContext};
