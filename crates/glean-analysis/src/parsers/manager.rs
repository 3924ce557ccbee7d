//! ParserManager: routes files to the correct tree-sitter grammar.

use std::path::Path;

use glean_core::errors::ParseError;

use super::types::ParsedTree;
use crate::scanner::language_detect::Language;

/// Stateless front to tree-sitter. A fresh `tree_sitter::Parser` is built per
/// call, so one manager can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParserManager;

impl ParserManager {
    pub fn new() -> Self {
        Self
    }

    /// Detect language from file extension.
    pub fn detect_language(&self, path: &Path) -> Option<Language> {
        Language::from_extension(path.extension().and_then(|e| e.to_str()))
    }

    /// Parse a file, detecting the grammar from its extension.
    ///
    /// Trees containing syntax errors are returned as-is; use
    /// [`parse_strict`](Self::parse_strict) to reject them.
    pub fn parse(&self, source: &[u8], path: &Path) -> Result<ParsedTree, ParseError> {
        let lang = self
            .detect_language(path)
            .ok_or_else(|| ParseError::UnsupportedLanguage {
                extension: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?;
        self.parse_with_language(source, path, lang)
    }

    /// Parse with a known language (skips detection).
    pub fn parse_with_language(
        &self,
        source: &[u8],
        path: &Path,
        lang: Language,
    ) -> Result<ParsedTree, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&lang.ts_language())
            .map_err(|e| ParseError::GrammarLoad {
                language: lang.name().to_string(),
                message: e.to_string(),
            })?;

        let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
            path: path.to_path_buf(),
        })?;

        Ok(ParsedTree::new(tree, lang, path))
    }

    /// Parse and reject any tree containing ERROR or MISSING nodes.
    pub fn parse_strict(
        &self,
        source: &[u8],
        path: &Path,
        lang: Language,
    ) -> Result<ParsedTree, ParseError> {
        let parsed = self.parse_with_language(source, path, lang)?;
        if let Some(issue) = parsed.first_issue() {
            return Err(ParseError::Syntax {
                path: path.to_path_buf(),
                line: issue.line,
                column: issue.column,
                kind: issue.kind,
            });
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml() {
        let pm = ParserManager::new();
        let tree = pm.parse(b"a: 1\n", Path::new("x.yaml")).unwrap();
        assert_eq!(tree.root_node().kind(), "stream");
        assert!(!tree.has_error());
        assert_eq!(tree.language(), Language::Yaml);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let pm = ParserManager::new();
        let err = pm.parse(b"", Path::new("x.rs")).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedLanguage { ref extension } if extension == "rs"));
    }

    #[test]
    fn strict_parse_rejects_unterminated_flow_mapping() {
        let pm = ParserManager::new();
        let err = pm
            .parse_strict(b"openapi: 3.0.0\ninfo: {title: x\n", Path::new("x.yaml"), Language::Yaml)
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn empty_source_has_no_issue() {
        let pm = ParserManager::new();
        let tree = pm.parse_strict(b"", Path::new("x.yaml"), Language::Yaml).unwrap();
        assert!(tree.first_issue().is_none());
    }
}
