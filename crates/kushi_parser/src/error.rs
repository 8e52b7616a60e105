//! Parse error types.

use kushi_ast::Position;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("{message} at line {line}, column {column}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Line where the error occurred (1-indexed).
        line: u32,
        /// Column where the error occurred (0-indexed).
        column: u32,
    },

    /// An internal parser error occurred.
    #[error("internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    /// Creates a new invalid source error at the given position.
    pub fn invalid_source(message: impl Into<String>, pos: Position) -> Self {
        Self::InvalidSource {
            message: message.into(),
            line: pos.line,
            column: pos.column,
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
