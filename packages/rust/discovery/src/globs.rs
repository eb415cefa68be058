//! Glob expansion into candidate package directories.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use docsite_shared::{DocsiteError, Result};
use tracing::debug;

/// Expand `patterns` into the existing directories they match.
///
/// Patterns are expanded in input order; matches within one pattern keep the
/// order `glob` yields them. Files are discarded, and a directory matched more
/// than once (by one or several patterns, or through symlinks to the same
/// target) is kept only at its first position. Relative patterns are resolved
/// against `root` when given, otherwise against the working directory.
///
/// Returned paths are absolute but not canonicalized: a symlinked package is
/// reported under the name it was matched by.
pub fn get_all_directories<S: AsRef<str>>(
    patterns: &[S],
    root: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut dirs = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let resolved = resolve_pattern(pattern, root);

        let matches = glob::glob(&resolved)
            .map_err(|e| DocsiteError::pattern(pattern, e.to_string()))?;

        let mut matched = 0usize;
        for entry in matches {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    debug!(pattern, error = %e, "skipping unreadable match");
                    continue;
                }
            };

            if !path.is_dir() {
                continue;
            }

            let canonical =
                std::fs::canonicalize(&path).map_err(|e| DocsiteError::io(&path, e))?;
            if seen.insert(canonical) {
                let matched_path =
                    std::path::absolute(&path).map_err(|e| DocsiteError::io(&path, e))?;
                matched += 1;
                dirs.push(matched_path);
            } else {
                debug!(pattern, path = %path.display(), "directory already matched");
            }
        }

        debug!(pattern, matched, "pattern expanded");
    }

    Ok(dirs)
}

fn resolve_pattern(pattern: &str, root: Option<&Path>) -> String {
    match root {
        Some(root) if Path::new(pattern).is_relative() => {
            let base = glob::Pattern::escape(&root.to_string_lossy());
            Path::new(&base).join(pattern).to_string_lossy().into_owned()
        }
        _ => pattern.to_string(),
    }
}
