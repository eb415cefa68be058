//! Filesystem discovery primitives for the package catalog.
//!
//! Everything here is synchronous and only reads the filesystem:
//! - [`get_all_directories`] — glob patterns → candidate package directories
//! - [`extract_definition`] — `package.json` / `manifest.json` lookup
//! - [`get_files_in_dir`] — shallow listing of `examples/` and `docs/`
//! - [`is_example`] / [`is_doc`] — which listed files are renderable

mod classify;
mod globs;
mod metadata;
mod scanner;

pub use classify::{DOC_EXTENSIONS, EXAMPLE_EXTENSION, is_doc, is_example};
pub use globs::get_all_directories;
pub use metadata::{
    PackageDefinition, extract_definition, get_manifest_definition, get_package_definition,
};
pub use scanner::get_files_in_dir;
