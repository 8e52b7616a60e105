//! Engine error types.

use kushi_plugin::ValueError;
use thiserror::Error;

/// Errors that can occur while building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid plugin descriptor, ordering cycle, or bad orchestrator
    /// configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A plugin rejected its raw configuration value.
    #[error("invalid value for option `{plugin}`: {source}")]
    Value {
        /// The plugin whose option failed coercion.
        plugin: String,
        /// The coercion failure.
        #[source]
        source: ValueError,
    },

    /// The parser collaborator rejected the source, enriched with the
    /// filename (when known) and the engine version.
    #[error("{0}")]
    Parse(String),

    /// A `transform` or `lint` callback failed; the run was aborted.
    #[error("plugin `{plugin}` failed: {message}")]
    Rule {
        /// The plugin whose callback failed.
        plugin: String,
        /// The callback's error message.
        message: String,
    },

    /// I/O error from the file-system collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a parse error carrying the filename (when known) and the
    /// engine version tag.
    pub fn parse(message: impl AsRef<str>, filename: Option<&str>) -> Self {
        let mut parts = Vec::with_capacity(3);
        if let Some(filename) = filename {
            parts.push(filename.to_string());
        }
        parts.push(message.as_ref().to_string());
        parts.push(format!("Kushi Core version: {}", env!("CARGO_PKG_VERSION")));
        Self::Parse(parts.join("\n"))
    }
}
