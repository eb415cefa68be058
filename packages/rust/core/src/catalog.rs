//! Catalog output for the page generator.

use std::path::Path;

use docsite_shared::{Catalog, DocsiteError, Result};
use tracing::info;

/// Render a catalog as pretty-printed JSON with a trailing newline.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    let mut json = serde_json::to_string_pretty(catalog)
        .map_err(|e| DocsiteError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Write a catalog to `path`, creating parent directories as needed.
pub fn write_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocsiteError::io(parent, e))?;
    }

    std::fs::write(path, render_catalog(catalog)?).map_err(|e| DocsiteError::io(path, e))?;
    info!(
        path = %path.display(),
        packages = catalog.packages.len(),
        "catalog written"
    );
    Ok(())
}
