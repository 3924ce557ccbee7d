//! Parallel file walker using the `ignore` crate's `WalkParallel`.
//!
//! Honours `.gitignore`, the custom ignore file (`.gleanignore` by default,
//! gitignore syntax, hierarchical) and a fixed set of default ignores.

use std::path::Path;

use crossbeam_channel as channel;
use glean_core::config::ScanConfig;
use glean_core::errors::ScanError;

use super::language_detect::Language;
use super::types::DiscoveredFile;

/// Directory names never descended into.
pub const DEFAULT_IGNORES: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "coverage",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".next",
    ".nuxt",
];

/// Walk a directory tree in parallel, collecting discovered files.
///
/// Returns files sorted by path so runs are deterministic.
pub fn walk_directory(root: &Path, config: &ScanConfig) -> Result<Vec<DiscoveredFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let (tx, rx) = channel::unbounded();

    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(config.effective_ignore_filename())
        .max_filesize(Some(config.effective_max_file_size()))
        .follow_links(config.effective_follow_symlinks());

    let threads = config.effective_threads();
    if threads > 0 {
        builder.threads(threads);
    }

    // Positive globs whitelist, `!` globs blacklist.
    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in &config.include {
        add_override(&mut overrides, pattern)?;
    }
    for pattern in DEFAULT_IGNORES {
        add_override(&mut overrides, &format!("!{pattern}/**"))?;
        add_override(&mut overrides, &format!("!{pattern}"))?;
    }
    for pattern in &config.extra_ignore {
        add_override(&mut overrides, &format!("!{pattern}"))?;
    }
    let built = overrides.build().map_err(|e| ScanError::InvalidOverride {
        pattern: "<overrides>".to_string(),
        message: e.to_string(),
    })?;
    builder.overrides(built);

    builder.build_parallel().run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable walk entry");
                    return ignore::WalkState::Continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                return ignore::WalkState::Continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => return ignore::WalkState::Continue,
            };

            let path = entry.into_path();
            let language = Language::from_extension(path.extension().and_then(|e| e.to_str()));
            let mtime = metadata
                .modified()
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);

            let _ = tx.send(DiscoveredFile {
                path,
                file_size: metadata.len(),
                mtime,
                language,
            });

            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<DiscoveredFile> = rx.into_iter().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(root = %root.display(), files = files.len(), "walk complete");
    Ok(files)
}

fn add_override(
    builder: &mut ignore::overrides::OverrideBuilder,
    pattern: &str,
) -> Result<(), ScanError> {
    builder
        .add(pattern)
        .map(|_| ())
        .map_err(|e| ScanError::InvalidOverride {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
