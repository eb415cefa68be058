//! Shallow directory listing.
//!
//! Only immediate children are listed; nested `examples/` or `docs/`
//! subdirectories are not descended into.

use std::path::Path;

use docsite_shared::{DocsiteError, FileRef, Result};

/// List every immediate child of `dir` as a [`FileRef`].
///
/// Returns an empty list when `dir` does not exist. Files and directories are
/// both returned, in the order the filesystem yields them; filtering is up to
/// the caller.
pub fn get_files_in_dir(dir: &Path) -> Result<Vec<FileRef>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let dir = std::path::absolute(dir).map_err(|e| DocsiteError::io(dir, e))?;
    let entries = std::fs::read_dir(&dir).map_err(|e| DocsiteError::io(&dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DocsiteError::io(&dir, e))?;
        let path = entry.path();
        let id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(FileRef { id, path });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = get_files_in_dir(&dir.path().join("examples")).expect("scan");
        assert!(files.is_empty());
    }

    #[test]
    fn lists_files_and_directories_one_level_deep() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("one.js"), "").expect("write");
        std::fs::write(dir.path().join("two.test.js"), "").expect("write");
        std::fs::create_dir_all(dir.path().join("nested").join("deep")).expect("mkdir");
        std::fs::write(dir.path().join("nested").join("deep").join("three.js"), "")
            .expect("write");

        let mut files = get_files_in_dir(dir.path()).expect("scan");
        files.sort_by(|a, b| a.id.cmp(&b.id));

        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["nested", "one", "two.test"]);
        assert!(files.iter().all(|f| f.path.is_absolute()));
        assert!(files.iter().all(|f| f.path.parent() == Some(dir.path())));
    }

    #[test]
    fn relative_dir_yields_absolute_paths() {
        let files = get_files_in_dir(Path::new("src")).expect("scan crate src");
        assert!(!files.is_empty());
        assert!(files.iter().all(|f| f.path.is_absolute()));
        assert!(files.iter().any(|f| f.id == "scanner"));
    }
}
