//! Violation records produced by lint-mode plugins.

use kushi_ast::Position;
use serde::{Deserialize, Serialize};

/// A single lint finding: where, and what.
///
/// Plugins produce violations without a filename; the dispatcher stamps
/// one on when the run was given a file. Field order makes the derived
/// ordering sort by location first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Violation {
    /// Line of the finding (1-indexed).
    pub line: u32,

    /// Column of the finding (0-indexed).
    pub column: u32,

    /// Human-readable description.
    pub message: String,

    /// File the violation was found in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            filename: None,
        }
    }

    /// Creates a new violation at a node position.
    pub fn at(message: impl Into<String>, pos: Position) -> Self {
        Self::new(message, pos.line, pos.column)
    }

    /// Sets the filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}
