//! Node identity: explicit, integer-keyed addressing of syntax nodes.

pub mod node_map;

pub use node_map::{NodeIdMap, NodeRecord};
