//! Shared types: collections, identifiers, source locations.

pub mod collections;
pub mod identifiers;
pub mod source;
