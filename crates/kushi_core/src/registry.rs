//! Ordered plugin registry.
//!
//! Registration order is the default total order; a `run_before`
//! declaration is a precedence edge that must hold in the final order.
//! Edges targeting plugins that have not arrived yet are parked in a
//! pending map and resolved the moment the target registers, preserving
//! the order in which the constraints were recorded. Edges that close a
//! cycle are fatal at the registration that closes it.

use std::collections::{HashMap, HashSet};

use kushi_plugin::Plugin;
use tracing::{debug, warn};

use crate::EngineError;

/// An ordered sequence of plugin descriptors plus unresolved precedence
/// constraints.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
    /// Target name -> names of registered plugins waiting to precede it.
    pending: HashMap<String, Vec<String>>,
    syntaxes: HashSet<String>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin descriptor.
    ///
    /// Returns `Ok(true)` when the plugin was inserted and `Ok(false)`
    /// when a plugin with the same name already exists (the new
    /// descriptor is discarded and a warning logged). Invalid
    /// descriptors and `run_before` cycles are fatal.
    pub fn register(&mut self, plugin: Plugin) -> Result<bool, EngineError> {
        plugin
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        if self.contains(plugin.name()) {
            warn!(
                plugin = plugin.name(),
                "plugin registered twice; keeping the first registration"
            );
            return Ok(false);
        }

        if let Some(target) = plugin.runs_before() {
            self.check_cycle(plugin.name(), target)?;
        }

        for syntax in plugin.syntaxes() {
            self.syntaxes.insert(syntax.clone());
        }

        let name = plugin.name().to_string();
        match plugin.runs_before().map(str::to_owned) {
            Some(target) => match self.index_of(&target) {
                Some(i) => {
                    debug!(plugin = %name, before = %target, "inserting before target");
                    self.plugins.insert(i, plugin);
                }
                None => {
                    debug!(plugin = %name, before = %target, "target not registered yet");
                    self.plugins.push(plugin);
                    self.pending.entry(target).or_default().push(name.clone());
                }
            },
            None => self.plugins.push(plugin),
        }

        // The new arrival may be the target other plugins were waiting
        // for: relocate each, in recorded order, to sit just before it.
        if let Some(waiting) = self.pending.remove(&name) {
            for waiting_name in waiting {
                let Some(from) = self.index_of(&waiting_name) else {
                    continue;
                };
                let moved = self.plugins.remove(from);
                match self.index_of(&name) {
                    Some(to) => self.plugins.insert(to, moved),
                    None => self.plugins.push(moved),
                }
            }
        }

        Ok(true)
    }

    /// Walks the `run_before` chain starting at `target`, failing if it
    /// leads back to `candidate`.
    fn check_cycle(&self, candidate: &str, target: &str) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        let mut current = target.to_string();
        loop {
            if current == candidate {
                return Err(EngineError::Config(format!(
                    "`run_before` cycle detected involving plugin `{candidate}`"
                )));
            }
            if !seen.insert(current.clone()) {
                break;
            }
            match self.lookup(&current).and_then(|p| p.runs_before()) {
                Some(next) => current = next.to_string(),
                None => break,
            }
        }
        Ok(())
    }

    /// Returns true if a plugin with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Looks up a plugin by name.
    pub fn lookup(&self, name: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    /// Looks up a plugin by name, mutably (used by configuration).
    pub(crate) fn lookup_mut(&mut self, name: &str) -> Option<&mut Plugin> {
        self.plugins.iter_mut().find(|p| p.name() == name)
    }

    /// Returns the position of a plugin in the current order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.plugins.iter().position(|p| p.name() == name)
    }

    /// Iterates plugins in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Returns true if any registered plugin supports the syntax tag.
    pub fn supports_syntax(&self, syntax: &str) -> bool {
        self.syntaxes.contains(syntax)
    }

    /// The union of all registered plugins' syntax tags.
    pub fn syntaxes(&self) -> impl Iterator<Item = &str> {
        self.syntaxes.iter().map(String::as_str)
    }
}
