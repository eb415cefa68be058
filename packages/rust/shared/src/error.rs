//! Error types for docsite.
//!
//! Library crates use [`DocsiteError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all docsite operations.
#[derive(Debug, thiserror::Error)]
pub enum DocsiteError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A `package.json` or `manifest.json` that is not valid JSON.
    #[error("malformed package definition {path:?}: {source}")]
    Definition {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Two package directories share a base name.
    #[error("duplicate package id '{id}': {second:?} collides with {first:?}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A glob pattern with invalid syntax.
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// A bundler build step failed.
    #[error("bundle error: {0}")]
    Bundle(String),

    /// The filesystem watcher could not be set up or torn down.
    #[error("watch error: {0}")]
    Watch(String),

    /// The HTTP layer could not bind its port.
    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },

    /// The HTTP layer failed while running or shutting down.
    #[error("server error: {0}")]
    Server(String),

    /// Output serialization error.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocsiteError>;

impl DocsiteError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON parse failure with the offending file.
    pub fn definition(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Definition {
            path: path.into(),
            source,
        }
    }

    pub fn pattern(pattern: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocsiteError::config("static root missing");
        assert_eq!(err.to_string(), "config error: static root missing");

        let err = DocsiteError::pattern("pkgs/[", "unclosed bracket");
        assert!(err.to_string().contains("pkgs/["));
    }

    #[test]
    fn definition_error_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = DocsiteError::definition("/repo/pkgs/a/package.json", source);
        assert!(err.to_string().contains("/repo/pkgs/a/package.json"));
    }

    #[test]
    fn bind_error_names_port() {
        let err = DocsiteError::Bind {
            port: 3001,
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("3001"));
        assert!(msg.contains("address in use"));
    }
}
