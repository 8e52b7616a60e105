//! Dual-mode pipeline dispatch.
//!
//! A `Dispatcher` is a per-call view over the registry and the resolved
//! configuration. The two modes are separate methods with separate
//! signatures: formatting takes the tree mutably, linting takes it
//! shared, so a lint run cannot mutate the tree through the dispatcher
//! at all. Plugins run strictly one after another in registry order —
//! later plugins may depend on structural changes earlier ones made.

use kushi_ast::Node;
use kushi_plugin::{Plugin, ResolvedConfig, Violation};
use tracing::debug;

use crate::{EngineError, PluginRegistry};

/// The two pipeline modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite the tree in place.
    Format,
    /// Collect violations without touching the tree.
    Lint,
}

impl Mode {
    /// Returns true for lint mode.
    pub fn is_lint(self) -> bool {
        matches!(self, Self::Lint)
    }
}

/// A single dispatch pass over one tree.
pub struct Dispatcher<'a> {
    registry: &'a PluginRegistry,
    config: &'a ResolvedConfig,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over the given registry and configuration.
    pub fn new(registry: &'a PluginRegistry, config: &'a ResolvedConfig) -> Self {
        Self { registry, config }
    }

    /// A plugin participates iff it is enabled and supports the syntax.
    /// The mode-specific callback check happens at the call site, since
    /// each mode looks at a different slot.
    fn selected(plugin: &Plugin, syntax: &str) -> bool {
        plugin.is_enabled() && plugin.supports_syntax(syntax)
    }

    /// Runs every selected `transform` over the tree, in registry order.
    /// The same tree handle threads through every call, so mutations
    /// compound.
    pub fn run_format(&self, tree: &mut Node, syntax: &str) -> Result<(), EngineError> {
        for plugin in self.registry.iter() {
            if !Self::selected(plugin, syntax) {
                continue;
            }
            let Some(transform) = plugin.transform_fn() else {
                continue;
            };
            debug!(plugin = plugin.name(), syntax, "running transform");
            transform(tree, syntax, self.config).map_err(|e| EngineError::Rule {
                plugin: plugin.name().to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Runs every selected `lint` over the tree, in registry order,
    /// concatenating each plugin's violations into one flat sequence.
    /// When a filename is supplied, every record is stamped with it.
    pub fn run_lint(
        &self,
        tree: &Node,
        syntax: &str,
        filename: Option<&str>,
    ) -> Result<Vec<Violation>, EngineError> {
        let mut violations = Vec::new();
        for plugin in self.registry.iter() {
            if !Self::selected(plugin, syntax) {
                continue;
            }
            let Some(lint) = plugin.lint_fn() else {
                continue;
            };
            debug!(plugin = plugin.name(), syntax, "running lint");
            let found = lint(tree, syntax, self.config).map_err(|e| EngineError::Rule {
                plugin: plugin.name().to_string(),
                message: e.to_string(),
            })?;
            violations.extend(found);
        }

        if let Some(filename) = filename {
            for violation in &mut violations {
                violation.filename = Some(filename.to_string());
            }
        }

        Ok(violations)
    }
}
