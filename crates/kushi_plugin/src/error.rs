//! Plugin error types.

use thiserror::Error;

/// Errors raised while coercing a raw configuration value.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The boolean is not in the allowed set.
    #[error("value must be one of the following: {}", format_bools(.allowed))]
    UnacceptableBoolean {
        /// The booleans the option accepts.
        allowed: Vec<bool>,
    },

    /// The number has a fractional part or is negative.
    #[error("value must be a non-negative integer")]
    UnacceptableNumber,

    /// The string does not match the acceptance pattern.
    #[error("value must match pattern {pattern}")]
    UnacceptableString {
        /// Human-readable rendering of the pattern.
        pattern: String,
    },

    /// The raw value has a kind the acceptance table does not cover.
    #[error("the option does not accept values of type {got}; accepted: {}", .accepted.join(", "))]
    UnacceptableType {
        /// Kind of the rejected raw value.
        got: &'static str,
        /// Kinds the acceptance table covers.
        accepted: Vec<&'static str>,
    },

    /// The raw value has a kind only a custom coercion could handle.
    #[error("to accept values of type {got} the plugin must provide a custom coercion")]
    ImplementCoerce {
        /// Kind of the rejected raw value.
        got: &'static str,
    },
}

fn format_bools(allowed: &[bool]) -> String {
    allowed
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by plugin descriptors and plugin callbacks.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The descriptor has no usable name.
    #[error("plugin must have a non-empty `name`")]
    MissingName,

    /// The descriptor lists no supported syntaxes.
    #[error("plugin `{0}` must list at least one supported syntax")]
    MissingSyntaxes(String),

    /// The descriptor has neither an acceptance table nor a custom coercion.
    #[error("plugin `{0}` must provide an `accepts` table or a custom coercion")]
    MissingCoercion(String),

    /// A `transform` or `lint` callback failed.
    #[error("{0}")]
    Rule(String),
}

impl PluginError {
    /// Creates a callback failure error.
    pub fn rule(message: impl Into<String>) -> Self {
        Self::Rule(message.into())
    }
}
