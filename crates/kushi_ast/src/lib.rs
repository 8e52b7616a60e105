//! # kushi_ast
//!
//! Syntax tree definitions for the Kushi style engine.
//!
//! This crate provides the tree handle shared by the parser collaborator and
//! style plugins. Format-mode plugins rewrite the tree in place; lint-mode
//! plugins only inspect it. Serializing a tree back to source text is the
//! tree's `Display` implementation, which reproduces the input byte for byte
//! when no plugin has touched it.
//!
//! ## Example
//!
//! ```rust
//! use kushi_ast::{Node, NodeKind, Position};
//!
//! let pos = Position::new(1, 0);
//! let decl = Node::parent(
//!     NodeKind::Declaration,
//!     pos,
//!     vec![
//!         Node::text(NodeKind::Property, pos, "color"),
//!         Node::text(NodeKind::Delimiter, Position::new(1, 5), ":"),
//!         Node::text(NodeKind::Value, Position::new(1, 6), " red"),
//!     ],
//! );
//!
//! assert_eq!(decl.to_string(), "color: red");
//! ```

mod node;
mod position;

pub use node::{Node, NodeContent, NodeKind};
pub use position::Position;
