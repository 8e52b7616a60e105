//! Parser trait definition.

use kushi_ast::Node;

use crate::ParseError;

/// Options for a single parse call.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions<'a> {
    /// Syntax tag the source was written in (e.g. `"css"`, `"scss"`).
    pub syntax: &'a str,
    /// Optional entry production. `None` parses a whole stylesheet;
    /// `"declarations"` parses bare declarations without surrounding
    /// braces (inline-style fragments).
    pub context: Option<&'a str>,
}

impl<'a> ParseOptions<'a> {
    /// Creates options for a full-stylesheet parse of the given syntax.
    pub fn new(syntax: &'a str) -> Self {
        Self {
            syntax,
            context: None,
        }
    }

    /// Sets the entry production.
    pub fn context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }
}

/// Trait for parsing source text into a Kushi tree.
///
/// Implementations of this trait convert source text into the mutable tree
/// that plugins rewrite or inspect. The tree's `Display` impl must
/// reproduce the parsed input exactly, which is what makes the engine's
/// unchanged-file detection work.
pub trait Parser {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the syntax tags this parser handles (e.g. `["css", "scss"]`).
    fn syntaxes(&self) -> &[&str];

    /// Parses the source text into a tree.
    fn parse(&self, source: &str, options: &ParseOptions<'_>) -> Result<Node, ParseError>;

    /// Returns true if this parser can handle the given syntax tag.
    fn supports(&self, syntax: &str) -> bool {
        self.syntaxes()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(syntax))
    }
}
