//! Acceptance tables for raw configuration values.

use regex::Regex;

/// A string acceptance pattern: an exact literal or a regular expression.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// The raw string must equal this literal.
    Exact(String),
    /// The raw string must contain a match of this expression.
    Regex(Regex),
}

impl Pattern {
    /// Creates an exact-literal pattern.
    pub fn exact(literal: impl Into<String>) -> Self {
        Self::Exact(literal.into())
    }

    /// Creates a regular-expression pattern.
    pub fn regex(regex: Regex) -> Self {
        Self::Regex(regex)
    }

    /// Returns true if the raw string satisfies the pattern.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Exact(literal) => literal == raw,
            Self::Regex(regex) => regex.is_match(raw),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(literal) => write!(f, "{literal:?}"),
            Self::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Which raw-value kinds an option accepts, and how.
///
/// A kind absent from the table rejects raw values of that kind. Numbers
/// have no pattern: enabling them means any non-negative integer, which
/// coercion materializes as an indentation string of that many spaces.
#[derive(Debug, Clone, Default)]
pub struct Accepts {
    pub(crate) boolean: Option<Vec<bool>>,
    pub(crate) number: bool,
    pub(crate) string: Option<Pattern>,
}

impl Accepts {
    /// Creates an empty acceptance table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the given boolean literals.
    pub fn boolean(mut self, allowed: &[bool]) -> Self {
        self.boolean = Some(allowed.to_vec());
        self
    }

    /// Accepts non-negative integers (materialized as space strings).
    pub fn number(mut self) -> Self {
        self.number = true;
        self
    }

    /// Accepts strings matching the given pattern.
    pub fn string(mut self, pattern: Pattern) -> Self {
        self.string = Some(pattern);
        self
    }

    /// Accepts exactly the given string literal.
    pub fn string_exact(self, literal: impl Into<String>) -> Self {
        self.string(Pattern::exact(literal))
    }

    /// Accepts strings matching the given regular expression.
    pub fn string_regex(self, regex: Regex) -> Self {
        self.string(Pattern::regex(regex))
    }

    /// The kinds this table covers, for error reporting.
    pub(crate) fn kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if self.boolean.is_some() {
            kinds.push("boolean");
        }
        if self.number {
            kinds.push("number");
        }
        if self.string.is_some() {
            kinds.push("string");
        }
        kinds
    }
}
