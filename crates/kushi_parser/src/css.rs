//! Lossless parser for the CSS syntax family.
//!
//! Produces the tree shape the dispatcher hands to plugins: rulesets with
//! selector/block children, declarations split into property, delimiter and
//! value, at-rules with a raw prelude, and explicit whitespace/comment
//! nodes. Printing the tree reproduces the input exactly.
//!
//! The grammar is deliberately shallow. Selector, prelude and value text
//! stay raw; the scanner only needs to be exact about the places where
//! structure begins and ends, which means skipping strings, comments,
//! `#{...}` interpolation and balanced parentheses while looking for the
//! next structural character.

use kushi_ast::{Node, NodeKind, Position};

use crate::{ParseError, ParseOptions, Parser};

/// Built-in parser for `css`, `scss` and `less` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssParser;

impl CssParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }
}

impl Parser for CssParser {
    fn name(&self) -> &str {
        "css"
    }

    fn syntaxes(&self) -> &[&str] {
        &["css", "scss", "less"]
    }

    fn parse(&self, source: &str, options: &ParseOptions<'_>) -> Result<Node, ParseError> {
        let line_comments = options.syntax.eq_ignore_ascii_case("scss")
            || options.syntax.eq_ignore_ascii_case("less");
        let mut scanner = Scanner::new(source, line_comments);

        let children = match options.context {
            None => scanner.parse_entries(true)?,
            Some("declarations") => {
                let entries = scanner.parse_entries(false)?;
                if !scanner.is_eof() {
                    return Err(ParseError::invalid_source("unexpected `}`", scanner.pos()));
                }
                entries
            }
            Some(other) => {
                return Err(ParseError::internal(format!(
                    "unknown parse context `{other}`"
                )));
            }
        };

        Ok(Node::parent(NodeKind::Stylesheet, Position::start(), children))
    }
}

fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Splits a raw slice into its content and trailing whitespace.
fn split_trailing_ws(raw: &str) -> (&str, &str) {
    let content = raw.trim_end_matches(is_css_whitespace);
    (content, &raw[content.len()..])
}

/// Advances a position over the given text.
fn advance_position(mut pos: Position, text: &str) -> Position {
    for c in text.chars() {
        if c == '\n' {
            pos.line += 1;
            pos.column = 0;
        } else {
            pos.column += 1;
        }
    }
    pos
}

enum EntryKind {
    Ruleset,
    Declaration,
}

#[derive(Clone)]
struct Scanner<'s> {
    src: &'s str,
    i: usize,
    line: u32,
    column: u32,
    line_comments: bool,
}

impl<'s> Scanner<'s> {
    fn new(src: &'s str, line_comments: bool) -> Self {
        Self {
            src,
            i: 0,
            line: 1,
            column: 0,
            line_comments,
        }
    }

    fn is_eof(&self) -> bool {
        self.i >= self.src.len()
    }

    fn rest(&self) -> &'s str {
        &self.src[self.i..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.i;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.i]
    }

    /// Consumes a quoted string, escape-aware. Unterminated strings run to
    /// end of input.
    fn skip_string(&mut self) {
        let Some(quote) = self.bump() else { return };
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                break;
            }
        }
    }

    /// Consumes a `/* ... */` comment, starting at the opening slash.
    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos();
        self.bump();
        self.bump();
        loop {
            if self.starts_with("*/") {
                self.bump();
                self.bump();
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(ParseError::invalid_source("unterminated comment", start));
            }
        }
    }

    /// Consumes a `#{ ... }` interpolation, brace-balanced and string-aware.
    fn skip_interpolation(&mut self) {
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            if c == '"' || c == '\'' {
                self.skip_string();
                continue;
            }
            self.bump();
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    /// Consumes raw text up to (not including) the first unnested stop
    /// character, skipping strings, comments, interpolation and balanced
    /// parentheses.
    fn scan_raw(&mut self, stops: &[char]) -> Result<&'s str, ParseError> {
        let start = self.i;
        let mut parens = 0usize;
        loop {
            let Some(c) = self.peek() else { break };
            if c == '"' || c == '\'' {
                self.skip_string();
                continue;
            }
            if self.starts_with("/*") {
                self.skip_comment()?;
                continue;
            }
            if self.starts_with("#{") {
                self.skip_interpolation();
                continue;
            }
            match c {
                '(' => parens += 1,
                ')' if parens > 0 => parens -= 1,
                _ if parens == 0 && stops.contains(&c) => break,
                _ => {}
            }
            self.bump();
        }
        Ok(&self.src[start..self.i])
    }

    /// Decides whether the entry starting here is a ruleset or a
    /// declaration: whichever of `{` / `;` / `}` (or end of input) comes
    /// first, outside strings, comments, interpolation and parentheses.
    fn classify_entry(&self) -> EntryKind {
        let mut probe = self.clone();
        let mut parens = 0usize;
        loop {
            let Some(c) = probe.peek() else {
                return EntryKind::Declaration;
            };
            if c == '"' || c == '\'' {
                probe.skip_string();
                continue;
            }
            if probe.starts_with("/*") {
                if probe.skip_comment().is_err() {
                    return EntryKind::Declaration;
                }
                continue;
            }
            if probe.starts_with("#{") {
                probe.skip_interpolation();
                continue;
            }
            match c {
                '(' => parens += 1,
                ')' if parens > 0 => parens -= 1,
                '{' if parens == 0 => return EntryKind::Ruleset,
                ';' | '}' if parens == 0 => return EntryKind::Declaration,
                _ => {}
            }
            probe.bump();
        }
    }

    /// Parses a run of entries. At the top level a stray `}` is an error;
    /// inside a block (or a `declarations` context) it ends the run.
    fn parse_entries(&mut self, top_level: bool) -> Result<Vec<Node>, ParseError> {
        let mut entries = Vec::new();
        loop {
            let Some(c) = self.peek() else { break };
            if c == '}' {
                if top_level {
                    return Err(ParseError::invalid_source("unexpected `}`", self.pos()));
                }
                break;
            }
            if is_css_whitespace(c) {
                let pos = self.pos();
                let ws = self.take_while(is_css_whitespace);
                entries.push(Node::text(NodeKind::Space, pos, ws));
                continue;
            }
            if self.starts_with("/*") {
                entries.push(self.comment()?);
                continue;
            }
            if self.line_comments && self.starts_with("//") {
                entries.push(self.line_comment());
                continue;
            }
            if c == ';' {
                let pos = self.pos();
                self.bump();
                entries.push(Node::text(NodeKind::Delimiter, pos, ";"));
                continue;
            }
            if c == '@' {
                entries.push(self.at_rule()?);
                continue;
            }
            match self.classify_entry() {
                EntryKind::Ruleset => entries.push(self.ruleset()?),
                EntryKind::Declaration => entries.push(self.declaration()?),
            }
        }
        Ok(entries)
    }

    fn comment(&mut self) -> Result<Node, ParseError> {
        let pos = self.pos();
        let start = self.i;
        self.skip_comment()?;
        let text = &self.src[start + 2..self.i - 2];
        Ok(Node::text(NodeKind::Comment, pos, text))
    }

    fn line_comment(&mut self) -> Node {
        let pos = self.pos();
        self.bump();
        self.bump();
        let start = self.i;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        Node::text(NodeKind::LineComment, pos, &self.src[start..self.i])
    }

    fn at_rule(&mut self) -> Result<Node, ParseError> {
        let start = self.pos();
        let prelude = self.scan_raw(&['{', ';', '}'])?;
        let mut children = vec![Node::text(NodeKind::Prelude, start, prelude)];
        match self.peek() {
            Some('{') => children.push(self.parse_block()?),
            Some(';') => {
                let pos = self.pos();
                self.bump();
                children.push(Node::text(NodeKind::Delimiter, pos, ";"));
            }
            // End of input or a closing brace owned by the enclosing block.
            _ => {}
        }
        Ok(Node::parent(NodeKind::AtRule, start, children))
    }

    fn ruleset(&mut self) -> Result<Node, ParseError> {
        let start = self.pos();
        let raw = self.scan_raw(&['{', ';', '}'])?;
        if self.peek() != Some('{') {
            return Err(ParseError::invalid_source(
                "expected `{` to open a block",
                self.pos(),
            ));
        }
        let (selector, ws) = split_trailing_ws(raw);
        let mut children = vec![Node::text(NodeKind::Selector, start, selector)];
        if !ws.is_empty() {
            children.push(Node::text(
                NodeKind::Space,
                advance_position(start, selector),
                ws,
            ));
        }
        children.push(self.parse_block()?);
        Ok(Node::parent(NodeKind::Ruleset, start, children))
    }

    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let start = self.pos();
        self.bump();
        let children = self.parse_entries(false)?;
        if self.peek() != Some('}') {
            return Err(ParseError::invalid_source(
                "unclosed block (missing `}`)",
                start,
            ));
        }
        self.bump();
        Ok(Node::parent(NodeKind::Block, start, children))
    }

    fn declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.pos();
        let raw = self.scan_raw(&[':', ';', '}'])?;
        let (property, ws) = split_trailing_ws(raw);
        let mut children = vec![Node::text(NodeKind::Property, start, property)];
        if !ws.is_empty() {
            children.push(Node::text(
                NodeKind::Space,
                advance_position(start, property),
                ws,
            ));
        }
        if self.peek() == Some(':') {
            let pos = self.pos();
            self.bump();
            children.push(Node::text(NodeKind::Delimiter, pos, ":"));
            let value_pos = self.pos();
            let value = self.scan_raw(&[';', '}'])?;
            if !value.is_empty() {
                children.push(Node::text(NodeKind::Value, value_pos, value));
            }
        }
        Ok(Node::parent(NodeKind::Declaration, start, children))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parse(source: &str, syntax: &str) -> Node {
        CssParser::new()
            .parse(source, &ParseOptions::new(syntax))
            .unwrap()
    }

    #[rstest]
    #[case::simple("a { color: red; }")]
    #[case::no_trailing_semicolon("a{color:red}")]
    #[case::multiple_rules("a { color: red; }\n\np, .btn {\n  margin: 0;\n}\n")]
    #[case::comments("/* top */\na { /* inner */ color: red; }")]
    #[case::at_rule_block("@media screen and (min-width: 100px) {\n  a { color: red; }\n}")]
    #[case::at_rule_statement("@import 'base.css';\n@charset \"utf-8\";")]
    #[case::string_with_braces("a[href=\"x{y;z}\"] { content: \"a;b\"; }")]
    #[case::url_with_semicolon("a { background: url(data:image/png;base64,AAAA); }")]
    #[case::pseudo_selector("a:hover, a::before { color: red; }")]
    #[case::empty_block("a {}")]
    #[case::stray_semicolons("a { ;; color: red;; }")]
    fn test_css_round_trip(#[case] source: &str) {
        assert_eq!(parse(source, "css").to_string(), source);
    }

    #[rstest]
    #[case::nested("a {\n  b { color: red; }\n}")]
    #[case::variables("$width: 10px;\na { width: $width; }")]
    #[case::line_comments("// header\na { color: red; // note\n}")]
    #[case::interpolation("a { width: #{$w}px; }")]
    #[case::interpolated_selector(".icon-#{$name} { color: red; }")]
    #[case::nested_at_rule("a {\n  @include flex;\n  b { color: red; }\n}")]
    fn test_scss_round_trip(#[case] source: &str) {
        assert_eq!(parse(source, "scss").to_string(), source);
    }

    #[test]
    fn test_ruleset_structure() {
        let tree = parse("a { color: red; }", "css");
        let children = tree.children().unwrap();
        assert_eq!(children.len(), 1);

        let ruleset = &children[0];
        assert!(ruleset.is(NodeKind::Ruleset));

        let parts = ruleset.children().unwrap();
        assert!(parts[0].is(NodeKind::Selector));
        assert_eq!(parts[0].as_text(), Some("a"));
        assert!(parts[1].is(NodeKind::Space));
        assert!(parts[2].is(NodeKind::Block));
    }

    #[test]
    fn test_declaration_structure() {
        let tree = parse("a{color: red}", "css");
        let block = &tree.children().unwrap()[0].children().unwrap()[1];
        let decl = &block.children().unwrap()[0];
        assert!(decl.is(NodeKind::Declaration));

        let parts = decl.children().unwrap();
        assert_eq!(parts[0].as_text(), Some("color"));
        assert!(parts[1].is(NodeKind::Delimiter));
        assert_eq!(parts[2].as_text(), Some(" red"));
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let tree = parse("a {\n  color: red;\n}", "css");
        let ruleset = &tree.children().unwrap()[0];
        assert_eq!(ruleset.pos, Position::new(1, 0));

        let block = &ruleset.children().unwrap()[2];
        let decl = &block.children().unwrap()[1];
        assert!(decl.is(NodeKind::Declaration));
        assert_eq!(decl.pos, Position::new(2, 2));
    }

    #[test]
    fn test_line_comments_only_outside_plain_css() {
        // In plain css, `//` is not a comment marker (protocol-relative
        // urls must survive); in scss it opens a line comment.
        let css = parse("a { background: url(//cdn/x.png); }", "css");
        assert_eq!(css.to_string(), "a { background: url(//cdn/x.png); }");

        let scss = parse("// note\n", "scss");
        let children = scss.children().unwrap();
        assert!(children[0].is(NodeKind::LineComment));
        assert_eq!(children[0].as_text(), Some(" note"));
    }

    #[test]
    fn test_context_declarations() {
        let parser = CssParser::new();
        let tree = parser
            .parse(
                "color: red; margin: 0",
                &ParseOptions::new("css").context("declarations"),
            )
            .unwrap();

        assert_eq!(tree.to_string(), "color: red; margin: 0");
        let kinds: Vec<_> = tree.children().unwrap().iter().map(|n| n.kind).collect();
        assert!(kinds.contains(&NodeKind::Declaration));
        assert!(!kinds.contains(&NodeKind::Ruleset));
    }

    #[test]
    fn test_unknown_context_is_rejected() {
        let parser = CssParser::new();
        let err = parser
            .parse("a {}", &ParseOptions::new("css").context("selector"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Internal(_)));
    }

    #[rstest]
    #[case::unclosed_block("a { color: red;", "unclosed block")]
    #[case::unterminated_comment("a { } /* trailing", "unterminated comment")]
    #[case::stray_closing_brace("a { } }", "unexpected `}`")]
    fn test_parse_errors(#[case] source: &str, #[case] expected: &str) {
        let err = CssParser::new()
            .parse(source, &ParseOptions::new("css"))
            .unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "error `{err}` should contain `{expected}`"
        );
    }

    #[test]
    fn test_parse_error_location() {
        let err = CssParser::new()
            .parse("a {\n  color: red;\n", &ParseOptions::new("css"))
            .unwrap_err();
        match err {
            ParseError::InvalidSource { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 2);
            }
            other => panic!("expected InvalidSource, got {other:?}"),
        }
    }

    #[test]
    fn test_supports() {
        let parser = CssParser::new();
        assert!(parser.supports("css"));
        assert!(parser.supports("SCSS"));
        assert!(parser.supports("less"));
        assert!(!parser.supports("sass"));
    }

    #[test]
    fn test_empty_source() {
        let tree = parse("", "css");
        assert_eq!(tree.children().unwrap().len(), 0);
        assert_eq!(tree.to_string(), "");
    }
}
