//! Predicates deciding whether a path can be rendered as an example or doc page.
//!
//! Both predicates stat the path, so they fail on entries that do not exist.
//! Callers pass paths they have just listed from the filesystem.

use std::path::Path;

use docsite_shared::{DocsiteError, Result};

/// Extension of example source files.
pub const EXAMPLE_EXTENSION: &str = "js";

/// Extensions of documentation pages.
pub const DOC_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Whether `path` is a regular file with the example script extension.
pub fn is_example(path: &Path) -> Result<bool> {
    Ok(is_file(path)? && has_extension(path, &[EXAMPLE_EXTENSION]))
}

/// Whether `path` is a regular file with a documentation markup extension.
pub fn is_doc(path: &Path) -> Result<bool> {
    Ok(is_file(path)? && has_extension(path, &DOC_EXTENSIONS))
}

fn is_file(path: &Path) -> Result<bool> {
    std::fs::metadata(path)
        .map(|meta| meta.is_file())
        .map_err(|e| DocsiteError::io(path, e))
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.contains(&ext))
}
