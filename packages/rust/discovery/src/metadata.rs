//! Package metadata extraction from `package.json` / `manifest.json`.

use std::path::Path;

use docsite_shared::{DefinitionKind, DocsiteError, Result};
use serde_json::{Map, Value};

/// A parsed definition file: freeform JSON object plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDefinition {
    pub kind: DefinitionKind,
    pub fields: Map<String, Value>,
}

impl PackageDefinition {
    /// A top-level field copied as-is.
    pub fn value_field(&self, key: &str) -> Option<Value> {
        self.fields.get(key).cloned()
    }
}

/// Read `pkg_path/package.json`, or `None` if it does not exist.
pub fn get_package_definition(pkg_path: &Path) -> Result<Option<PackageDefinition>> {
    read_definition(pkg_path, DefinitionKind::PackageJson)
}

/// Read `pkg_path/manifest.json`, or `None` if it does not exist.
pub fn get_manifest_definition(pkg_path: &Path) -> Result<Option<PackageDefinition>> {
    read_definition(pkg_path, DefinitionKind::Manifest)
}

/// Find a package's definition: `package.json` first, then `manifest.json`
/// when `use_manifests` is set. `None` means the directory is not a package.
pub fn extract_definition(
    pkg_path: &Path,
    use_manifests: bool,
) -> Result<Option<PackageDefinition>> {
    if let Some(definition) = get_package_definition(pkg_path)? {
        return Ok(Some(definition));
    }

    if use_manifests {
        return get_manifest_definition(pkg_path);
    }

    Ok(None)
}

fn read_definition(pkg_path: &Path, kind: DefinitionKind) -> Result<Option<PackageDefinition>> {
    let path = pkg_path.join(kind.file_name());
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| DocsiteError::io(&path, e))?;
    let fields: Map<String, Value> =
        serde_json::from_str(&content).map_err(|e| DocsiteError::definition(&path, e))?;

    Ok(Some(PackageDefinition { kind, fields }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).expect("write");
        }
        dir
    }

    #[test]
    fn reads_package_json() {
        let dir = pkg_with(&[(
            "package.json",
            r#"{ "name": "a", "version": "1.0.0", "maintainers": ["x"], "private": true }"#,
        )]);
        let def = get_package_definition(dir.path()).unwrap().expect("definition");

        assert_eq!(def.kind, DefinitionKind::PackageJson);
        assert_eq!(def.value_field("name"), Some(serde_json::json!("a")));
        assert_eq!(def.value_field("description"), None);
        assert_eq!(def.value_field("maintainers"), Some(serde_json::json!(["x"])));
    }

    #[test]
    fn non_string_fields_are_kept() {
        let dir = pkg_with(&[("package.json", r#"{ "version": 2 }"#)]);
        let def = get_package_definition(dir.path()).unwrap().expect("definition");
        assert_eq!(def.value_field("version"), Some(serde_json::json!(2)));
    }

    #[test]
    fn absent_files_yield_none() {
        let dir = pkg_with(&[]);
        assert!(get_package_definition(dir.path()).unwrap().is_none());
        assert!(get_manifest_definition(dir.path()).unwrap().is_none());
    }

    #[test]
    fn manifest_only_used_when_enabled() {
        let dir = pkg_with(&[("manifest.json", r#"{ "name": "from-manifest" }"#)]);

        assert!(extract_definition(dir.path(), false).unwrap().is_none());

        let def = extract_definition(dir.path(), true).unwrap().expect("manifest");
        assert_eq!(def.kind, DefinitionKind::Manifest);
        assert_eq!(def.value_field("name"), Some(serde_json::json!("from-manifest")));
    }

    #[test]
    fn package_json_wins_over_manifest() {
        let dir = pkg_with(&[
            ("package.json", r#"{ "name": "pkg" }"#),
            ("manifest.json", r#"{ "name": "manifest" }"#),
        ]);
        let def = extract_definition(dir.path(), true).unwrap().expect("definition");
        assert_eq!(def.kind, DefinitionKind::PackageJson);
        assert_eq!(def.value_field("name"), Some(serde_json::json!("pkg")));
    }

    #[test]
    fn malformed_json_names_the_file() {
        let dir = pkg_with(&[("package.json", "{ \"name\": ")]);
        let err = get_package_definition(dir.path()).unwrap_err();

        match &err {
            DocsiteError::Definition { path, .. } => {
                assert_eq!(path, &dir.path().join("package.json"));
            }
            other => panic!("expected Definition error, got {other:?}"),
        }
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn non_object_definition_is_malformed() {
        let dir = pkg_with(&[("manifest.json", "[1, 2]")]);
        let err = extract_definition(dir.path(), true).unwrap_err();
        assert!(matches!(err, DocsiteError::Definition { .. }));
    }
}
