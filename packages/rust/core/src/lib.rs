//! Package catalog orchestration for docsite.
//!
//! This crate ties the discovery primitives together into the package scan
//! (`get_packages_info`) and writes the resulting catalog for the page generator.

pub mod catalog;
pub mod pipeline;

pub use catalog::{render_catalog, write_catalog};
pub use pipeline::{ScanObserver, SilentObserver, get_packages_info, get_packages_info_with};
