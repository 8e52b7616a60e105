//! Source position type.
//!
//! Uses 1-indexed lines and 0-indexed columns, matching the convention of
//! the violation records that lint plugins produce.

use serde::{Deserialize, Serialize};

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of the first byte of a source file.
    #[inline]
    pub const fn start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}
