//! Shared types, error model, and configuration for docsite.
//!
//! This crate is the foundation depended on by all other docsite crates.
//! It provides:
//! - [`DocsiteError`] — the unified error type
//! - Domain types ([`PackageRecord`], [`FileRef`], [`ScanResult`], [`Catalog`])
//! - Configuration ([`AppConfig`], [`ScanOptions`], [`DevServerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BundlerKind, CONFIG_FILE_NAME, DEFAULT_PORT, DevServerConfig, ScanOptions,
    ScanSection, ServerSection, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DocsiteError, Result};
pub use types::{Catalog, DefinitionKind, FileRef, PackageRecord, ScanFailure, ScanResult};
