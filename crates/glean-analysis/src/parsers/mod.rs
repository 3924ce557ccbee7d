//! Syntax tree provider: bytes plus grammar in, owned tree out.

pub mod manager;
pub mod types;

pub use manager::ParserManager;
pub use types::ParsedTree;
