//! # kushi_plugin
//!
//! Plugin descriptors for the Kushi style engine.
//!
//! This crate provides:
//! - The `Plugin` capability record every rule unit must satisfy
//! - Acceptance tables and value coercion for raw configuration values
//! - The `Violation` record lint callbacks produce
//!
//! ## Architecture
//!
//! A plugin is data, not a trait object: a name, the syntaxes it supports,
//! exactly one way to coerce its raw configuration value, and optional
//! `transform`/`lint` callback slots. The dispatcher decides which plugins
//! run by checking which slots are present for the active mode; a plugin
//! whose value was never configured stays disabled.
//!
//! ## Example
//!
//! ```rust
//! use kushi_plugin::{Accepts, Plugin};
//!
//! let plugin = Plugin::new("block-indent", &["css", "scss"])
//!     .accepts(Accepts::new().number().string_exact("\t"))
//!     .transform(|_tree, _syntax, _config| Ok(()));
//!
//! assert_eq!(plugin.name(), "block-indent");
//! assert!(!plugin.is_enabled());
//! ```

mod accepts;
mod descriptor;
mod error;
mod violation;

pub use accepts::{Accepts, Pattern};
pub use descriptor::{CoerceFn, Coercion, LintFn, Plugin, ResolvedConfig, TransformFn};
pub use error::{PluginError, ValueError};
pub use violation::Violation;
