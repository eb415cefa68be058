//! Development server for the docs website.
//!
//! This crate provides:
//! - [`bundler`] — build steps and the watch session that re-runs them
//! - [`DevServer`] — static file layer with single-page fallback routing,
//!   serving whatever the latest completed build produced

pub mod bundler;
pub mod dev_server;

pub use bundler::{BuildStep, BundleOptions, CommandStep, CopyStep, WatchBundler, WatchSubscription};
pub use dev_server::{DIST_DIR, DevServer, ENTRY_FILE, STATIC_DIR, SiteLayout, router};
