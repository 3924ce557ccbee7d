//! Rule bundle loading and compilation.
//!
//! Bundles use the gitleaks v8 TOML layout: a `title`, `[[rules]]` with
//! `id`, `description`, `regex`, `secretGroup`, `entropy`, `keywords`,
//! `path` and a per-rule `[rules.allowlist]`, plus a global `[allowlist]`.
//! Unknown keys (`tags`, `entropy` on allowlists, ...) are ignored.

use std::path::Path;

use aho_corasick::AhoCorasick;
use glean_core::errors::ConfigError;
use regex::bytes::Regex;
use serde::Deserialize;

/// Rule bundle compiled into the binary.
pub const EMBEDDED_BUNDLE: &str = include_str!("default_rules.toml");

const EMBEDDED_NAME: &str = "<embedded>";

#[derive(Debug, Deserialize)]
struct RawBundle {
    title: Option<String>,
    #[serde(default)]
    rules: Vec<RawRule>,
    allowlist: Option<RawAllowlist>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
    description: Option<String>,
    regex: Option<String>,
    #[serde(rename = "secretGroup")]
    secret_group: Option<usize>,
    entropy: Option<f64>,
    #[serde(default)]
    keywords: Vec<String>,
    path: Option<String>,
    allowlist: Option<RawAllowlist>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAllowlist {
    #[serde(default)]
    paths: Vec<String>,
    #[serde(default)]
    regexes: Vec<String>,
    #[serde(default)]
    stopwords: Vec<String>,
}

/// Compiled allowlist. Matches are dropped when any entry applies.
#[derive(Debug, Default)]
pub struct Allowlist {
    paths: Vec<regex::Regex>,
    regexes: Vec<regex::Regex>,
    /// Lower-cased.
    stopwords: Vec<String>,
}

impl Allowlist {
    pub fn allows_path(&self, path: &str) -> bool {
        self.paths.iter().any(|re| re.is_match(path))
    }

    pub fn allows_secret(&self, secret: &str) -> bool {
        if self.regexes.iter().any(|re| re.is_match(secret)) {
            return true;
        }
        let lower = secret.to_ascii_lowercase();
        self.stopwords.iter().any(|w| lower.contains(w.as_str()))
    }
}

/// One compiled rule.
#[derive(Debug)]
pub struct SecretRule {
    pub id: String,
    pub description: String,
    pub regex: Regex,
    pub secret_group: Option<usize>,
    /// Minimum Shannon entropy of the secret; `0.0` disables the gate.
    pub entropy: f64,
    pub path: Option<regex::Regex>,
    pub allowlist: Allowlist,
    has_keywords: bool,
}

impl SecretRule {
    pub fn has_keywords(&self) -> bool {
        self.has_keywords
    }
}

/// An immutable, compiled rule bundle. Build once and share.
#[derive(Debug)]
pub struct SecretRuleSet {
    pub title: String,
    rules: Vec<SecretRule>,
    allowlist: Allowlist,
    keywords: Option<AhoCorasick>,
    /// Keyword pattern index to the rules that listed it.
    keyword_rules: Vec<Vec<usize>>,
}

impl SecretRuleSet {
    /// The bundle shipped with the crate.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(EMBEDDED_NAME, EMBEDDED_BUNDLE)
    }

    /// Load a bundle from disk.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&path.display().to_string(), &text)
    }

    /// Parse and compile a bundle. Any malformed rule fails the whole bundle.
    pub fn from_toml(bundle: &str, text: &str) -> Result<Self, ConfigError> {
        let raw: RawBundle = toml::from_str(text).map_err(|e| ConfigError::InvalidRuleBundle {
            bundle: bundle.to_string(),
            message: e.to_string(),
        })?;

        let allowlist = compile_allowlist(bundle, "<global>", raw.allowlist.unwrap_or_default())?;

        let mut rules = Vec::with_capacity(raw.rules.len());
        let mut keyword_patterns: Vec<String> = Vec::new();
        let mut keyword_rules: Vec<Vec<usize>> = Vec::new();

        for (idx, rule) in raw.rules.into_iter().enumerate() {
            let invalid = |message: String| ConfigError::InvalidRule {
                bundle: bundle.to_string(),
                rule_id: rule.id.clone(),
                message,
            };

            let source = rule
                .regex
                .as_deref()
                .ok_or_else(|| invalid("rule has no regex".to_string()))?;
            let regex = Regex::new(source).map_err(|e| invalid(e.to_string()))?;
            if let Some(group) = rule.secret_group {
                if group >= regex.captures_len() {
                    return Err(invalid(format!(
                        "secretGroup {group} exceeds {} capture groups",
                        regex.captures_len() - 1
                    )));
                }
            }
            let path = rule
                .path
                .as_deref()
                .map(regex::Regex::new)
                .transpose()
                .map_err(|e| invalid(e.to_string()))?;

            for keyword in &rule.keywords {
                let keyword = keyword.to_ascii_lowercase();
                match keyword_patterns.iter().position(|k| *k == keyword) {
                    Some(pos) => keyword_rules[pos].push(idx),
                    None => {
                        keyword_patterns.push(keyword);
                        keyword_rules.push(vec![idx]);
                    }
                }
            }

            rules.push(SecretRule {
                description: rule.description.clone().unwrap_or_else(|| rule.id.clone()),
                allowlist: compile_allowlist(bundle, &rule.id, rule.allowlist.unwrap_or_default())?,
                id: rule.id,
                regex,
                secret_group: rule.secret_group,
                entropy: rule.entropy.unwrap_or(0.0),
                path,
                has_keywords: !rule.keywords.is_empty(),
            });
        }

        let keywords = if keyword_patterns.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(&keyword_patterns)
                    .map_err(|e| ConfigError::InvalidRuleBundle {
                        bundle: bundle.to_string(),
                        message: e.to_string(),
                    })?,
            )
        };

        tracing::debug!(bundle, rules = rules.len(), keywords = keyword_patterns.len(), "compiled secret rules");

        Ok(Self {
            title: raw.title.unwrap_or_else(|| bundle.to_string()),
            rules,
            allowlist,
            keywords,
            keyword_rules,
        })
    }

    pub fn rules(&self) -> &[SecretRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    /// Per rule, whether it should run on `content`. Rules without keywords
    /// always run; the others need one of their keywords present.
    pub fn candidate_rules(&self, content: &[u8]) -> Vec<bool> {
        let mut active: Vec<bool> = self.rules.iter().map(|r| !r.has_keywords).collect();
        if let Some(ac) = &self.keywords {
            for m in ac.find_overlapping_iter(content) {
                for &rule in &self.keyword_rules[m.pattern().as_usize()] {
                    active[rule] = true;
                }
            }
        }
        active
    }
}

fn compile_allowlist(bundle: &str, owner: &str, raw: RawAllowlist) -> Result<Allowlist, ConfigError> {
    let compile = |sources: Vec<String>| -> Result<Vec<regex::Regex>, ConfigError> {
        sources
            .iter()
            .map(|s| {
                regex::Regex::new(s).map_err(|e| ConfigError::InvalidRule {
                    bundle: bundle.to_string(),
                    rule_id: owner.to_string(),
                    message: format!("allowlist: {e}"),
                })
            })
            .collect()
    };
    Ok(Allowlist {
        paths: compile(raw.paths)?,
        regexes: compile(raw.regexes)?,
        stopwords: raw.stopwords.iter().map(|w| w.to_ascii_lowercase()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bundle_compiles() {
        let set = SecretRuleSet::embedded().unwrap();
        assert!(set.len() >= 20);
        assert!(set.rules().iter().any(|r| r.id == "github-pat"));
    }

    #[test]
    fn bad_regex_is_invalid_rule() {
        let err = SecretRuleSet::from_toml("t", "[[rules]]\nid = \"x\"\nregex = '''(unclosed'''\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { ref rule_id, .. } if rule_id == "x"));
    }

    #[test]
    fn bad_toml_is_invalid_bundle() {
        let err = SecretRuleSet::from_toml("t", "[[rules]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRuleBundle { .. }));
    }

    #[test]
    fn secret_group_out_of_range() {
        let err = SecretRuleSet::from_toml(
            "t",
            "[[rules]]\nid = \"x\"\nregex = '''abc'''\nsecretGroup = 2\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { .. }));
    }

    #[test]
    fn keyword_prefilter() {
        let set = SecretRuleSet::from_toml(
            "t",
            r#"
[[rules]]
id = "a"
regex = '''tok_[a-z]+'''
keywords = ["TOK_"]

[[rules]]
id = "b"
regex = '''always'''
"#,
        )
        .unwrap();
        assert_eq!(set.candidate_rules(b"nothing here"), vec![false, true]);
        assert_eq!(set.candidate_rules(b"x = tok_abc"), vec![true, true]);
    }
}
