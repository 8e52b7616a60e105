//! # kushi_core
//!
//! Plugin orchestration engine for Kushi.
//!
//! This crate provides:
//! - The `Engine` orchestrator session
//! - The ordered `PluginRegistry` with `run_before` constraint resolution
//! - The dual-mode `Dispatcher` (format rewrites a tree, lint collects
//!   violations)
//! - Parallel directory batches with exclusion patterns
//!
//! ## Example
//!
//! ```rust
//! use kushi_core::{Accepts, Engine, Plugin, StringOptions};
//! use serde_json::json;
//!
//! let mut engine = Engine::new();
//! engine
//!     .use_plugin(
//!         Plugin::new("always-semicolon", &["css"])
//!             .accepts(Accepts::new().boolean(&[true]))
//!             .transform(|_tree, _syntax, _config| Ok(())),
//!     )
//!     .unwrap()
//!     .configure(&json!({ "always-semicolon": true }))
//!     .unwrap();
//!
//! let out = engine
//!     .format_string("a { color: red; }", &StringOptions::default())
//!     .unwrap();
//! assert_eq!(out, "a { color: red; }");
//! ```

mod dispatch;
mod engine;
mod error;
mod options;
mod registry;
mod walker;

pub use dispatch::{Dispatcher, Mode};
pub use engine::{Engine, ProcessOutcome, StringOptions};
pub use error::EngineError;
pub use registry::PluginRegistry;

pub use kushi_ast::{Node, NodeContent, NodeKind, Position};
pub use kushi_parser::{CssParser, ParseError, ParseOptions, Parser};
pub use kushi_plugin::{
    Accepts, Pattern, Plugin, PluginError, ResolvedConfig, ValueError, Violation,
};
