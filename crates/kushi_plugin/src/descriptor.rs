//! Plugin descriptor and value coercion.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kushi_ast::Node;
use serde_json::Value;

use crate::{Accepts, PluginError, ValueError, Violation};

/// Resolved configuration handed to plugin callbacks: plugin name to
/// coerced value, for every enabled plugin.
pub type ResolvedConfig = HashMap<String, Value>;

/// A format-mode callback. Mutates the tree in place.
pub type TransformFn =
    Arc<dyn Fn(&mut Node, &str, &ResolvedConfig) -> Result<(), PluginError> + Send + Sync>;

/// A lint-mode callback. Inspects the tree and reports violations; must
/// not mutate it.
pub type LintFn =
    Arc<dyn Fn(&Node, &str, &ResolvedConfig) -> Result<Vec<Violation>, PluginError> + Send + Sync>;

/// A custom coercion: turns the raw configuration value into the stored
/// value, owning all validation.
pub type CoerceFn = Arc<dyn Fn(&Value) -> Result<Value, ValueError> + Send + Sync>;

/// How a plugin's raw configuration value becomes its stored value.
/// Exactly one path exists per plugin.
#[derive(Clone)]
pub enum Coercion {
    /// Pattern-based acceptance table.
    Accepts(Accepts),
    /// Plugin-owned coercion function.
    Custom(CoerceFn),
}

/// A rule unit: immutable identity plus mutable enablement state.
///
/// Built with chained setters; `accepts` and `coerce_with` replace each
/// other so the descriptor always carries at most one coercion path.
/// Registration rejects descriptors that carry none.
#[derive(Clone)]
pub struct Plugin {
    name: String,
    syntaxes: Vec<String>,
    coercion: Option<Coercion>,
    transform: Option<TransformFn>,
    lint: Option<LintFn>,
    run_before: Option<String>,
    value: Option<Value>,
}

impl Plugin {
    /// Creates a descriptor with the given name and supported syntaxes.
    pub fn new(name: impl Into<String>, syntaxes: &[&str]) -> Self {
        Self {
            name: name.into(),
            syntaxes: syntaxes.iter().map(|s| s.to_string()).collect(),
            coercion: None,
            transform: None,
            lint: None,
            run_before: None,
            value: None,
        }
    }

    /// Sets the acceptance table (replaces any custom coercion).
    pub fn accepts(mut self, accepts: Accepts) -> Self {
        self.coercion = Some(Coercion::Accepts(accepts));
        self
    }

    /// Sets a custom coercion (replaces any acceptance table).
    pub fn coerce_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ValueError> + Send + Sync + 'static,
    {
        self.coercion = Some(Coercion::Custom(Arc::new(f)));
        self
    }

    /// Sets the format-mode callback.
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Node, &str, &ResolvedConfig) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Sets the lint-mode callback.
    pub fn lint<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node, &str, &ResolvedConfig) -> Result<Vec<Violation>, PluginError>
            + Send
            + Sync
            + 'static,
    {
        self.lint = Some(Arc::new(f));
        self
    }

    /// Declares that this plugin must run before the named plugin.
    pub fn run_before(mut self, name: impl Into<String>) -> Self {
        self.run_before = Some(name.into());
        self
    }

    /// The plugin's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The syntax tags this plugin supports.
    pub fn syntaxes(&self) -> &[String] {
        &self.syntaxes
    }

    /// Returns true if the plugin supports the given syntax tag.
    pub fn supports_syntax(&self, syntax: &str) -> bool {
        self.syntaxes.iter().any(|s| s == syntax)
    }

    /// The name of the plugin this one must precede, if any.
    pub fn runs_before(&self) -> Option<&str> {
        self.run_before.as_deref()
    }

    /// The format-mode callback slot.
    pub fn transform_fn(&self) -> Option<&TransformFn> {
        self.transform.as_ref()
    }

    /// The lint-mode callback slot.
    pub fn lint_fn(&self) -> Option<&LintFn> {
        self.lint.as_ref()
    }

    /// The coerced configuration value; `None` means disabled.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns true if the plugin has a configured value.
    pub fn is_enabled(&self) -> bool {
        self.value.is_some()
    }

    /// Checks the descriptor invariants enforced at registration.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.name.is_empty() {
            return Err(PluginError::MissingName);
        }
        if self.syntaxes.is_empty() {
            return Err(PluginError::MissingSyntaxes(self.name.clone()));
        }
        if self.coercion.is_none() {
            return Err(PluginError::MissingCoercion(self.name.clone()));
        }
        Ok(())
    }

    /// Coerces and stores the raw configuration value for this plugin.
    ///
    /// Re-applying the same raw value always yields the same stored value.
    pub fn set_value(&mut self, raw: &Value) -> Result<(), ValueError> {
        let coerced = match &self.coercion {
            Some(Coercion::Custom(coerce)) => coerce(raw)?,
            Some(Coercion::Accepts(accepts)) => Self::coerce_with_accepts(accepts, raw)?,
            None => {
                return Err(ValueError::ImplementCoerce {
                    got: json_kind(raw),
                });
            }
        };
        self.value = Some(coerced);
        Ok(())
    }

    fn coerce_with_accepts(accepts: &Accepts, raw: &Value) -> Result<Value, ValueError> {
        match raw {
            Value::Bool(b) => match &accepts.boolean {
                Some(allowed) if allowed.contains(b) => Ok(Value::Bool(*b)),
                Some(allowed) => Err(ValueError::UnacceptableBoolean {
                    allowed: allowed.clone(),
                }),
                None => Err(ValueError::UnacceptableType {
                    got: "boolean",
                    accepted: accepts.kinds(),
                }),
            },
            Value::Number(n) => {
                if !accepts.number {
                    return Err(ValueError::UnacceptableType {
                        got: "number",
                        accepted: accepts.kinds(),
                    });
                }
                // Width options materialize as literal indentation strings.
                match n.as_u64() {
                    Some(width) => Ok(Value::String(" ".repeat(width as usize))),
                    None => Err(ValueError::UnacceptableNumber),
                }
            }
            Value::String(s) => match &accepts.string {
                Some(pattern) if pattern.matches(s) => Ok(Value::String(s.clone())),
                Some(pattern) => Err(ValueError::UnacceptableString {
                    pattern: pattern.to_string(),
                }),
                None => Err(ValueError::UnacceptableType {
                    got: "string",
                    accepted: accepts.kinds(),
                }),
            },
            other => Err(ValueError::ImplementCoerce {
                got: json_kind(other),
            }),
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("syntaxes", &self.syntaxes)
            .field("run_before", &self.run_before)
            .field("value", &self.value)
            .field("has_transform", &self.transform.is_some())
            .field("has_lint", &self.lint.is_some())
            .finish()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
