//! Language detection from file extensions.

use serde::{Deserialize, Serialize};

/// Grammars the parser manager can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Yaml,
}

impl Language {
    /// Detect language from a file extension (case-insensitive).
    pub fn from_extension(ext: Option<&str>) -> Option<Self> {
        let ext = ext?;
        if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(Self::Yaml)
        } else {
            None
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn ts_language(self) -> tree_sitter::Language {
        match self {
            Self::Yaml => tree_sitter_yaml::LANGUAGE.into(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_extensions() {
        assert_eq!(Language::from_extension(Some("yaml")), Some(Language::Yaml));
        assert_eq!(Language::from_extension(Some("YML")), Some(Language::Yaml));
        assert_eq!(Language::from_extension(Some("json")), None);
        assert_eq!(Language::from_extension(None), None);
    }
}
