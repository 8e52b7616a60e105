//! # kushi_parser
//!
//! Parser abstraction layer for the Kushi style engine.
//!
//! This crate provides:
//! - A `Parser` trait for implementing custom parser collaborators
//! - A built-in lossless parser for the CSS family (css, scss, less)
//!
//! ## Architecture
//!
//! Parsers convert source text into the mutable tree defined by
//! `kushi_ast`. The tree's `Display` impl is the printer: parsing a string
//! and printing the tree reproduces the input byte for byte, so the engine
//! can detect "already well-formed" input by comparing strings.
//!
//! ## Example
//!
//! ```rust
//! use kushi_parser::{CssParser, ParseOptions, Parser};
//!
//! let parser = CssParser::new();
//! let source = "a { color: red; }";
//!
//! let tree = parser.parse(source, &ParseOptions::new("css")).unwrap();
//! assert_eq!(tree.to_string(), source);
//! ```

mod css;
mod error;
mod traits;

pub use css::CssParser;
pub use error::ParseError;
pub use traits::{ParseOptions, Parser};
