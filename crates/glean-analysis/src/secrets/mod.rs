//! Secret rule engine: a gitleaks-compatible rule bundle compiled into a
//! scanner that reports matches with 1-based line/column locations.

pub mod entropy;
pub mod rules;
pub mod scanner;

pub use rules::{SecretRule, SecretRuleSet, EMBEDDED_BUNDLE};
pub use scanner::{SecretMatch, SecretScanner};
