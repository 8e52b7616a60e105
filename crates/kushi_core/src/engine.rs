//! Orchestrator session.
//!
//! An `Engine` is built once — plugins registered, configuration applied —
//! and then processes strings, trees, files and directories any number of
//! times. Processing takes `&self`: the registry and resolved
//! configuration are read-only during dispatch, which is what makes the
//! directory fan-out safe to run in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use kushi_ast::Node;
use kushi_parser::{CssParser, ParseOptions, Parser};
use kushi_plugin::{Plugin, ResolvedConfig, Violation};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, Mode};
use crate::options::{EngineOptions, ORCHESTRATOR_KEYS};
use crate::{EngineError, PluginRegistry, walker};

const DEFAULT_SYNTAX: &str = "css";

/// Options for processing a single string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringOptions<'a> {
    /// Syntax tag of the source; defaults to `"css"`.
    pub syntax: Option<&'a str>,
    /// Filename to stamp on violations and parse errors.
    pub filename: Option<&'a str>,
    /// Parser entry production (e.g. `"declarations"` for inline styles).
    pub context: Option<&'a str>,
}

/// What a config-driven `process_path` call produced.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Format mode: the files that were rewritten.
    Formatted(Vec<PathBuf>),
    /// Lint mode: every violation found, stamped with its file.
    Violations(Vec<Violation>),
}

/// The public session object: registry, resolved configuration and the
/// parser collaborator.
pub struct Engine {
    registry: PluginRegistry,
    config: ResolvedConfig,
    options: EngineOptions,
    parser: Box<dyn Parser + Send + Sync>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine with the built-in CSS-family parser.
    pub fn new() -> Self {
        Self::with_parser(Box::new(CssParser::new()))
    }

    /// Creates an engine with a custom parser collaborator.
    pub fn with_parser(parser: Box<dyn Parser + Send + Sync>) -> Self {
        Self {
            registry: PluginRegistry::new(),
            config: ResolvedConfig::new(),
            options: EngineOptions::default(),
            parser,
        }
    }

    /// Registers a plugin. Duplicate names are skipped with a warning;
    /// invalid descriptors and ordering cycles are fatal.
    pub fn use_plugin(&mut self, plugin: Plugin) -> Result<&mut Self, EngineError> {
        self.registry.register(plugin)?;
        Ok(self)
    }

    /// The plugin registry, in dispatch order.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Applies a resolved configuration map.
    ///
    /// Orchestrator keys (`lint`, `verbose`, `exclude`, `syntax`) are
    /// consumed directly; every other key naming a registered plugin is
    /// routed through that plugin's value coercion; unrecognized keys
    /// are ignored.
    pub fn configure(&mut self, config: &Value) -> Result<&mut Self, EngineError> {
        let Some(map) = config.as_object() else {
            return Err(EngineError::config("configuration must be a JSON object"));
        };

        self.options = EngineOptions::from_map(map)?;

        for (key, raw) in map {
            if ORCHESTRATOR_KEYS.contains(&key.as_str()) {
                continue;
            }
            let Some(plugin) = self.registry.lookup_mut(key) else {
                debug!(key = %key, "ignoring unrecognized configuration key");
                continue;
            };
            plugin.set_value(raw).map_err(|source| EngineError::Value {
                plugin: key.clone(),
                source,
            })?;
            if let Some(value) = plugin.value() {
                let value = value.clone();
                self.config.insert(key.clone(), value);
            }
        }

        Ok(self)
    }

    /// The default mode config-driven entry points run in.
    pub fn mode(&self) -> Mode {
        if self.options.lint {
            Mode::Lint
        } else {
            Mode::Format
        }
    }

    /// Formats a string, returning the rewritten source.
    pub fn format_string(
        &self,
        text: &str,
        options: &StringOptions<'_>,
    ) -> Result<String, EngineError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let syntax = options.syntax.unwrap_or(DEFAULT_SYNTAX);
        let mut tree = self.parse(text, syntax, options)?;
        self.format_tree(&mut tree, syntax)?;
        Ok(tree.to_string())
    }

    /// Lints a string, returning every violation found.
    pub fn lint_string(
        &self,
        text: &str,
        options: &StringOptions<'_>,
    ) -> Result<Vec<Violation>, EngineError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let syntax = options.syntax.unwrap_or(DEFAULT_SYNTAX);
        let tree = self.parse(text, syntax, options)?;
        self.lint_tree(&tree, syntax, options.filename)
    }

    /// Runs the format pipeline over an already-parsed tree.
    pub fn format_tree(&self, tree: &mut Node, syntax: &str) -> Result<(), EngineError> {
        Dispatcher::new(&self.registry, &self.config).run_format(tree, syntax)
    }

    /// Runs the lint pipeline over an already-parsed tree.
    pub fn lint_tree(
        &self,
        tree: &Node,
        syntax: &str,
        filename: Option<&str>,
    ) -> Result<Vec<Violation>, EngineError> {
        Dispatcher::new(&self.registry, &self.config).run_lint(tree, syntax, filename)
    }

    fn parse(
        &self,
        text: &str,
        syntax: &str,
        options: &StringOptions<'_>,
    ) -> Result<Node, EngineError> {
        let mut parse_options = ParseOptions::new(syntax);
        if let Some(context) = options.context {
            parse_options = parse_options.context(context);
        }
        self.parser
            .parse(text, &parse_options)
            .map_err(|e| EngineError::parse(e.to_string(), options.filename))
    }

    /// Formats a single file in place.
    ///
    /// Returns the path when the file was rewritten and `None` when it
    /// was skipped (unsupported extension, excluded) or already
    /// well-formed — an unchanged file is never written back.
    pub fn format_file(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>, EngineError> {
        let path = path.as_ref();
        let Some(syntax) = self.file_syntax(path) else {
            debug!(path = %path.display(), "skipping file with unsupported extension");
            return Ok(None);
        };
        if self.is_excluded(path) {
            debug!(path = %path.display(), "skipping excluded file");
            return Ok(None);
        }

        let source = fs::read_to_string(path)?;
        let filename = path.to_string_lossy();
        let formatted = self.format_string(
            &source,
            &StringOptions {
                syntax: Some(&syntax),
                filename: Some(&filename),
                context: None,
            },
        )?;

        if formatted == source {
            if self.options.verbose {
                info!(path = %path.display(), "already well-formed");
            }
            return Ok(None);
        }

        fs::write(path, &formatted)?;
        if self.options.verbose {
            info!(path = %path.display(), "rewrote file");
        } else {
            debug!(path = %path.display(), "rewrote file");
        }
        Ok(Some(path.to_path_buf()))
    }

    /// Lints a single file. Never writes.
    pub fn lint_file(&self, path: impl AsRef<Path>) -> Result<Vec<Violation>, EngineError> {
        let path = path.as_ref();
        let Some(syntax) = self.file_syntax(path) else {
            debug!(path = %path.display(), "skipping file with unsupported extension");
            return Ok(Vec::new());
        };
        if self.is_excluded(path) {
            debug!(path = %path.display(), "skipping excluded file");
            return Ok(Vec::new());
        }

        let source = fs::read_to_string(path)?;
        let filename = path.to_string_lossy();
        self.lint_string(
            &source,
            &StringOptions {
                syntax: Some(&syntax),
                filename: Some(&filename),
                context: None,
            },
        )
    }

    /// Formats a file or a whole directory tree, returning the rewritten
    /// paths.
    pub fn format_path(&self, path: impl AsRef<Path>) -> Result<Vec<PathBuf>, EngineError> {
        let path = path.as_ref();
        if fs::metadata(path)?.is_dir() {
            self.format_directory(path)
        } else {
            Ok(self.format_file(path)?.into_iter().collect())
        }
    }

    /// Lints a file or a whole directory tree, returning one flat list
    /// of violations.
    pub fn lint_path(&self, path: impl AsRef<Path>) -> Result<Vec<Violation>, EngineError> {
        let path = path.as_ref();
        if fs::metadata(path)?.is_dir() {
            self.lint_directory(path)
        } else {
            self.lint_file(path)
        }
    }

    /// Processes a path in the configured default mode.
    pub fn process_path(&self, path: impl AsRef<Path>) -> Result<ProcessOutcome, EngineError> {
        match self.mode() {
            Mode::Lint => Ok(ProcessOutcome::Violations(self.lint_path(path)?)),
            Mode::Format => Ok(ProcessOutcome::Formatted(self.format_path(path)?)),
        }
    }

    /// Fans out over every discovered file; the first failure fails the
    /// whole batch.
    fn format_directory(&self, dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
        let files = walker::discover_files(dir, self.options.exclude.as_ref());
        let rewritten: Vec<Option<PathBuf>> = files
            .par_iter()
            .map(|path| self.format_file(path))
            .collect::<Result<_, _>>()?;
        Ok(rewritten.into_iter().flatten().collect())
    }

    fn lint_directory(&self, dir: &Path) -> Result<Vec<Violation>, EngineError> {
        let files = walker::discover_files(dir, self.options.exclude.as_ref());
        let found: Vec<Vec<Violation>> = files
            .par_iter()
            .map(|path| self.lint_file(path))
            .collect::<Result<_, _>>()?;
        Ok(found.into_iter().flatten().collect())
    }

    /// Maps a file to its syntax tag: alias-mapped extension, recognized
    /// by at least one registered plugin.
    fn file_syntax(&self, path: &Path) -> Option<String> {
        let extension = path.extension()?.to_str()?;
        let tag = self
            .options
            .syntax_aliases
            .get(extension)
            .cloned()
            .unwrap_or_else(|| extension.to_string());
        self.registry.supports_syntax(&tag).then_some(tag)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path = path.strip_prefix(".").unwrap_or(path);
        self.options
            .exclude
            .as_ref()
            .is_some_and(|set| set.is_match(path))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
