//! Node definition.
//!
//! The tree node type used throughout Kushi. Nodes own their children so
//! that format plugins can splice, rewrite and drop parts of the tree in
//! place; the `Display` impl serializes the tree back to source text.

use std::fmt;

use serde::Serialize;

use crate::Position;

/// The kind of a syntax-tree node.
///
/// Text kinds carry raw source text; parent kinds carry children. `Block`
/// is the one kind with its own delimiters: its `Display` wraps the
/// children in braces, and `Comment`/`LineComment` re-add their comment
/// markers, so the stored text never duplicates punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Root of a parsed source file.
    Stylesheet,
    /// A selector plus its block.
    Ruleset,
    /// Raw selector text.
    Selector,
    /// A brace-delimited group of declarations (and, for nested syntaxes,
    /// further rulesets).
    Block,
    /// One `property: value` pair.
    Declaration,
    /// Raw property text.
    Property,
    /// Raw value text, spaces preserved.
    Value,
    /// An `@`-rule with its prelude and optional block.
    AtRule,
    /// Raw at-rule prelude text, including the `@` keyword.
    Prelude,
    /// A run of whitespace.
    Space,
    /// A `/* ... */` comment; stored without the markers.
    Comment,
    /// A `// ...` comment (scss/less); stored without the markers.
    LineComment,
    /// Structural punctuation such as `:` and `;`.
    Delimiter,
}

/// Payload of a node: either raw text or child nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NodeContent {
    /// Raw source text.
    Text(String),
    /// Child nodes, in source order.
    Children(Vec<Node>),
}

/// A node in the syntax tree.
///
/// The position records where the node started in the original source.
/// Positions are not maintained across mutation; lint plugins (which never
/// mutate) can rely on them, transform plugins cannot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// The kind of this node.
    pub kind: NodeKind,
    /// Source position of the node's first byte.
    pub pos: Position,
    /// Text or children.
    pub content: NodeContent,
}

impl Node {
    /// Creates a new text node.
    pub fn text(kind: NodeKind, pos: Position, text: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            content: NodeContent::Text(text.into()),
        }
    }

    /// Creates a new parent node with children.
    pub fn parent(kind: NodeKind, pos: Position, children: Vec<Node>) -> Self {
        Self {
            kind,
            pos,
            content: NodeContent::Children(children),
        }
    }

    /// Returns true if this node has the given kind.
    #[inline]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Returns the raw text of a text node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text(s) => Some(s),
            NodeContent::Children(_) => None,
        }
    }

    /// Returns mutable access to the raw text of a text node.
    pub fn as_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            NodeContent::Text(s) => Some(s),
            NodeContent::Children(_) => None,
        }
    }

    /// Returns the children of a parent node.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.content {
            NodeContent::Children(c) => Some(c),
            NodeContent::Text(_) => None,
        }
    }

    /// Returns mutable access to the children of a parent node.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.content {
            NodeContent::Children(c) => Some(c),
            NodeContent::Text(_) => None,
        }
    }

    /// Visits this node and every descendant, depth first, in source order.
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&Node),
    {
        f(self);
        if let NodeContent::Children(children) = &self.content {
            for child in children {
                child.visit(f);
            }
        }
    }

    /// Visits this node and every descendant mutably, depth first.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node),
    {
        f(self);
        if let NodeContent::Children(children) = &mut self.content {
            for child in children {
                child.visit_mut(f);
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.content) {
            (NodeKind::Comment, NodeContent::Text(s)) => write!(f, "/*{s}*/"),
            (NodeKind::LineComment, NodeContent::Text(s)) => write!(f, "//{s}"),
            (_, NodeContent::Text(s)) => f.write_str(s),
            (NodeKind::Block, NodeContent::Children(children)) => {
                f.write_str("{")?;
                for child in children {
                    fmt::Display::fmt(child, f)?;
                }
                f.write_str("}")
            }
            (_, NodeContent::Children(children)) => {
                for child in children {
                    fmt::Display::fmt(child, f)?;
                }
                Ok(())
            }
        }
    }
}
