//! Orchestrator-level configuration keys.
//!
//! These four keys belong to the engine itself and are never routed
//! through plugin coercion. Every other key either names a plugin or is
//! silently ignored, which keeps old and new configuration files usable
//! across versions.

use std::collections::HashMap;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};

use crate::EngineError;

/// Configuration keys consumed directly by the orchestrator.
pub(crate) const ORCHESTRATOR_KEYS: [&str; 4] = ["lint", "verbose", "exclude", "syntax"];

/// Resolved orchestrator options.
#[derive(Default, Debug)]
pub(crate) struct EngineOptions {
    /// Default pipeline mode for config-driven entry points.
    pub lint: bool,
    /// Per-file progress reporting.
    pub verbose: bool,
    /// Compiled exclusion patterns.
    pub exclude: Option<GlobSet>,
    /// File-extension to syntax-tag overrides.
    pub syntax_aliases: HashMap<String, String>,
}

impl EngineOptions {
    /// Extracts the orchestrator keys from a configuration map.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, EngineError> {
        let lint = bool_key(map, "lint")?;
        let verbose = bool_key(map, "verbose")?;

        let exclude = match map.get("exclude") {
            None => None,
            Some(Value::Array(items)) => {
                let mut patterns = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(pattern) => patterns.push(pattern.to_string()),
                        None => {
                            return Err(EngineError::config(
                                "`exclude` must be an array of glob patterns",
                            ));
                        }
                    }
                }
                build_globset(&patterns)?
            }
            Some(_) => {
                return Err(EngineError::config(
                    "`exclude` must be an array of glob patterns",
                ));
            }
        };

        let syntax_aliases = match map.get("syntax") {
            None => HashMap::new(),
            Some(Value::Object(aliases)) => {
                let mut out = HashMap::with_capacity(aliases.len());
                for (extension, tag) in aliases {
                    match tag.as_str() {
                        Some(tag) => {
                            out.insert(extension.clone(), tag.to_string());
                        }
                        None => {
                            return Err(EngineError::config(
                                "`syntax` must map extensions to syntax tags",
                            ));
                        }
                    }
                }
                out
            }
            Some(_) => {
                return Err(EngineError::config(
                    "`syntax` must map extensions to syntax tags",
                ));
            }
        };

        Ok(Self {
            lint,
            verbose,
            exclude,
            syntax_aliases,
        })
    }
}

fn bool_key(map: &Map<String, Value>, key: &str) -> Result<bool, EngineError> {
    match map.get(key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(EngineError::config(format!("`{key}` must be a boolean"))),
    }
}

/// Compiles glob patterns into a `GlobSet`, once per configure call.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, EngineError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| EngineError::config(format!("invalid glob pattern: {e}")))?;
        builder.add(glob);
    }

    let globset = builder
        .build()
        .map_err(|e| EngineError::config(format!("failed to build glob set: {e}")))?;

    Ok(Some(globset))
}
