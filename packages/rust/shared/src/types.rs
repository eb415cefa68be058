//! Core domain types for the package catalog.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FileRef
// ---------------------------------------------------------------------------

/// A file discovered inside a package's `examples/` or `docs/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File name with its extension stripped (`one.js` → `one`).
    pub id: String,
    /// Absolute path to the file.
    pub path: PathBuf,
}

// ---------------------------------------------------------------------------
// PackageRecord
// ---------------------------------------------------------------------------

/// Which definition file supplied a package's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// `package.json`
    PackageJson,
    /// `manifest.json`, only consulted when manifests are enabled.
    Manifest,
}

impl DefinitionKind {
    /// The file name this kind is read from.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::Manifest => "manifest.json",
        }
    }
}

/// Catalog entry for one discovered package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Base name of the package directory. Unique within one scan.
    pub id: String,
    // Metadata fields are copied verbatim from the definition file, whatever their JSON type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<serde_json::Value>,
    /// Absolute path of the package directory.
    pub pkg_path: PathBuf,
    /// Path to `README.md`, or an empty path when the package has none.
    pub readme_path: PathBuf,
    pub examples_paths: Vec<FileRef>,
    pub docs_paths: Vec<FileRef>,
    pub definition: DefinitionKind,
}

impl PackageRecord {
    /// Whether a `README.md` was found for this package.
    pub fn has_readme(&self) -> bool {
        !self.readme_path.as_os_str().is_empty()
    }
}

// ---------------------------------------------------------------------------
// ScanResult
// ---------------------------------------------------------------------------

/// A candidate directory whose processing failed during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    /// The candidate directory.
    pub dir: PathBuf,
    /// Rendered error, naming the offending file where there is one.
    pub message: String,
}

/// Output of one aggregator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Packages in discovery order.
    pub packages: Vec<PackageRecord>,
    /// Every example path across all packages, flattened.
    pub external_sources: Vec<PathBuf>,
    /// Directories that could not be processed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ScanFailure>,
}

impl ScanResult {
    /// Find a package by its directory id.
    pub fn package(&self, id: &str) -> Option<&PackageRecord> {
        self.packages.iter().find(|p| p.id == id)
    }

    /// Whether `path` is one of the flattened external sources.
    pub fn is_external_source(&self, path: &Path) -> bool {
        self.external_sources.iter().any(|p| p == path)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The document handed to the page generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub generated_at: DateTime<Utc>,
    pub packages: Vec<PackageRecord>,
    pub external_sources: Vec<PathBuf>,
}

impl From<ScanResult> for Catalog {
    fn from(result: ScanResult) -> Self {
        Self {
            generated_at: Utc::now(),
            packages: result.packages,
            external_sources: result.external_sources,
        }
    }
}
