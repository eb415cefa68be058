//! Project configuration for docsite.
//!
//! Config lives at `docsite.toml` in the repository root.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DocsiteError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "docsite.toml";

/// Port the dev server binds when none is configured.
pub const DEFAULT_PORT: u16 = 3001;

// ---------------------------------------------------------------------------
// Config structs (matching docsite.toml schema)
// ---------------------------------------------------------------------------

/// Top-level project config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Package discovery settings.
    #[serde(default)]
    pub scan: ScanSection,

    /// Development server settings.
    #[serde(default)]
    pub server: ServerSection,
}

/// `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    /// Glob patterns selecting candidate package directories.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Fall back to `manifest.json` when `package.json` is absent.
    #[serde(default)]
    pub use_manifests: bool,

    /// Abort the whole scan on the first failing directory.
    #[serde(default)]
    pub strict: bool,

    /// Base directory for relative patterns (defaults to the working directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            use_manifests: false,
            strict: false,
            root: None,
        }
    }
}

fn default_patterns() -> Vec<String> {
    vec!["packages/*".into()]
}

/// Which build step the dev server's watcher runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundlerKind {
    /// Copy entry files into the output directory.
    #[default]
    Copy,
    /// Run an external bundler command.
    Command,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Port to bind; [`DEFAULT_PORT`] when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Directory holding `index.html`, `static/` and the build output.
    #[serde(default = "default_static_root")]
    pub static_root: String,

    #[serde(default)]
    pub bundler: BundlerKind,

    /// Program (and leading args) for [`BundlerKind::Command`].
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Window for coalescing bursts of file events into one rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: None,
            static_root: default_static_root(),
            bundler: BundlerKind::default(),
            command: default_command(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_static_root() -> String {
    "website".into()
}
fn default_command() -> Vec<String> {
    vec!["parcel".into()]
}
fn default_debounce_ms() -> u64 {
    50
}

// ---------------------------------------------------------------------------
// Runtime options (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime scan options for the package aggregator.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Consult `manifest.json` when `package.json` is absent.
    pub use_manifests: bool,
    /// Return the first error instead of collecting per-directory failures.
    pub strict: bool,
    /// Base directory for relative patterns.
    pub root: Option<PathBuf>,
}

impl From<&AppConfig> for ScanOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            use_manifests: config.scan.use_manifests,
            strict: config.scan.strict,
            root: config.scan.root.as_ref().map(PathBuf::from),
        }
    }
}

/// Runtime dev server configuration.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Port to bind; `None` means [`DEFAULT_PORT`].
    pub port: Option<u16>,
    pub static_root: PathBuf,
    pub bundler: BundlerKind,
    pub command: Vec<String>,
    pub debounce: Duration,
}

impl DevServerConfig {
    /// Config for `static_root` with every other setting at its default.
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self::from(&AppConfig::default()).with_static_root(static_root)
    }

    pub fn with_static_root(mut self, static_root: impl Into<PathBuf>) -> Self {
        self.static_root = static_root.into();
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// The port that will actually be bound.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

impl From<&AppConfig> for DevServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            port: config.server.port,
            static_root: PathBuf::from(&config.server.static_root),
            bundler: config.server.bundler,
            command: config.server.command.clone(),
            debounce: Duration::from_millis(config.server.debounce_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path to `docsite.toml` in the current working directory.
pub fn config_file_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| DocsiteError::io(".", e))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load the project config. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the project config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsiteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(DocsiteError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DocsiteError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| DocsiteError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("packages/*"));
        assert!(toml_str.contains("static_root"));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.scan.patterns, vec!["packages/*".to_string()]);
        assert!(!parsed.scan.use_manifests);
        assert_eq!(parsed.server.bundler, BundlerKind::Copy);
        assert_eq!(parsed.server.debounce_ms, 50);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[scan]
patterns = ["pkgs/*", "tools/*"]
use_manifests = true

[server]
port = 4000
bundler = "command"
command = ["npx", "parcel"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.scan.patterns.len(), 2);
        assert!(config.scan.use_manifests);
        assert!(!config.scan.strict);
        assert_eq!(config.server.port, Some(4000));
        assert_eq!(config.server.bundler, BundlerKind::Command);
        assert_eq!(config.server.static_root, "website");
    }

    #[test]
    fn server_config_defaults_port() {
        let server = DevServerConfig::new("/tmp/site");
        assert_eq!(server.effective_port(), DEFAULT_PORT);
        assert_eq!(server.with_port(Some(8080)).effective_port(), 8080);
    }

    #[test]
    fn scan_options_from_app_config() {
        let mut app = AppConfig::default();
        app.scan.use_manifests = true;
        app.scan.root = Some("/repo".into());
        let opts = ScanOptions::from(&app);
        assert!(opts.use_manifests);
        assert!(!opts.strict);
        assert_eq!(opts.root, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn init_refuses_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);

        init_config(&path).expect("first init");
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.server.static_root, "website");

        let err = init_config(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn malformed_config_names_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[scan\npatterns = 3").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
