//! End-to-end pipeline tests with a realistic plugin suite.
//!
//! Builds an engine the way an embedding tool would: register a few
//! interdependent plugins, apply a configuration parsed from JSON, then
//! format and lint a small project tree.

use std::fs;

use kushi_core::{Accepts, Engine, Node, NodeKind, Plugin, ProcessOutcome, Violation};
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::json;
use tempfile::TempDir;

/// Rewrites multi-line whitespace inside blocks to the configured
/// indentation (the coerced value of a numeric width is the literal
/// indent string).
fn block_indent_plugin() -> Plugin {
    Plugin::new("block-indent", &["css", "scss"])
        .accepts(Accepts::new().number().string_exact("\t"))
        .run_before("color-case")
        .transform(|tree, _syntax, config| {
            let indent = config
                .get("block-indent")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            reindent(tree, &indent, 0);
            Ok(())
        })
}

fn reindent(node: &mut Node, indent: &str, depth: usize) {
    if node.is(NodeKind::Block) {
        if let Some(children) = node.children_mut() {
            let count = children.len();
            for (i, child) in children.iter_mut().enumerate() {
                if child.is(NodeKind::Space)
                    && child.as_text().is_some_and(|t| t.contains('\n'))
                {
                    let level = if i + 1 == count { depth } else { depth + 1 };
                    *child.as_text_mut().unwrap() = format!("\n{}", indent.repeat(level));
                }
                reindent(child, indent, depth + 1);
            }
        }
    } else if let Some(children) = node.children_mut() {
        for child in children {
            reindent(child, indent, depth);
        }
    }
}

/// Transform lowercases hex colors; lint reports the ones a format run
/// would have to touch.
fn color_case_plugin() -> Plugin {
    Plugin::new("color-case", &["css", "scss"])
        .accepts(Accepts::new().string_regex(Regex::new("^lower$").unwrap()))
        .transform(|tree, _syntax, _config| {
            tree.visit_mut(&mut |node| {
                if node.is(NodeKind::Value) {
                    if let Some(text) = node.as_text_mut() {
                        *text = rewrite_hex(text);
                    }
                }
            });
            Ok(())
        })
        .lint(|tree, _syntax, _config| {
            let mut violations = Vec::new();
            tree.visit(&mut |node| {
                if node.is(NodeKind::Value)
                    && node.as_text().is_some_and(|t| t != rewrite_hex(t))
                {
                    violations.push(Violation::at("expected lowercase hex color", node.pos));
                }
            });
            Ok(violations)
        })
}

fn rewrite_hex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_hex = false;
    for c in text.chars() {
        if c == '#' {
            in_hex = true;
            out.push(c);
        } else if in_hex && c.is_ascii_hexdigit() {
            out.push(c.to_ascii_lowercase());
        } else {
            in_hex = false;
            out.push(c);
        }
    }
    out
}

/// Lint-only rule: `!important` is never acceptable.
fn no_important_plugin() -> Plugin {
    Plugin::new("no-important", &["css", "scss", "less"])
        .accepts(Accepts::new().boolean(&[true]))
        .lint(|tree, _syntax, _config| {
            let mut violations = Vec::new();
            tree.visit(&mut |node| {
                if node.is(NodeKind::Value)
                    && node.as_text().is_some_and(|t| t.contains("!important"))
                {
                    violations.push(Violation::at("unexpected `!important`", node.pos));
                }
            });
            Ok(violations)
        })
}

fn build_engine(config: serde_json::Value) -> Engine {
    let mut engine = Engine::new();
    engine
        .use_plugin(block_indent_plugin())
        .unwrap()
        .use_plugin(color_case_plugin())
        .unwrap()
        .use_plugin(no_important_plugin())
        .unwrap()
        .configure(&config)
        .unwrap();
    engine
}

#[test]
fn formats_a_project_tree_and_converges() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("base.css"), "a {\n color: #FF0000;\n}\n").unwrap();
    fs::write(
        root.join("nested.scss"),
        "a {\nb {\ncolor: #00FF00;\n}\n}\n",
    )
    .unwrap();

    let engine = build_engine(json!({
        "block-indent": 2,
        "color-case": "lower",
    }));

    let rewritten = engine.format_path(root).unwrap();
    assert_eq!(rewritten.len(), 2);

    assert_eq!(
        fs::read_to_string(root.join("base.css")).unwrap(),
        "a {\n  color: #ff0000;\n}\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("nested.scss")).unwrap(),
        "a {\n  b {\n    color: #00ff00;\n  }\n}\n"
    );

    // A second pass finds nothing to do: every file round-trips
    // unchanged and no write happens.
    let rewritten_again = engine.format_path(root).unwrap();
    assert!(rewritten_again.is_empty());
}

#[test]
fn lints_a_project_tree_without_touching_it() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let source = "a { color: #FF0000 !important; }\n";
    fs::write(root.join("base.css"), source).unwrap();

    let engine = build_engine(json!({
        "lint": true,
        "color-case": "lower",
        "no-important": true,
    }));

    let outcome = engine.process_path(root).unwrap();
    let violations = match outcome {
        ProcessOutcome::Violations(v) => v,
        other => panic!("expected violations, got {other:?}"),
    };

    let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["expected lowercase hex color", "unexpected `!important`"]
    );
    assert!(
        violations
            .iter()
            .all(|v| v.filename.as_deref().is_some_and(|f| f.ends_with("base.css")))
    );

    // Lint mode never writes.
    assert_eq!(fs::read_to_string(root.join("base.css")).unwrap(), source);
}

#[test]
fn run_before_orders_the_format_pipeline() {
    // block-indent declared `run_before("color-case")` but registered
    // first anyway; the declared edge must hold in the registry order.
    let engine = build_engine(json!({ "block-indent": 2, "color-case": "lower" }));
    let registry = engine.registry();

    let indent = registry.index_of("block-indent").unwrap();
    let color = registry.index_of("color-case").unwrap();
    assert!(indent < color);
}

#[test]
fn disabled_plugins_are_skipped_per_run() {
    // Only color-case is configured; block-indent stays disabled and the
    // ragged indentation survives formatting.
    let engine = build_engine(json!({ "color-case": "lower" }));

    let formatted = engine
        .format_string("a {\n color: #FF0000;\n}\n", &Default::default())
        .unwrap();
    assert_eq!(formatted, "a {\n color: #ff0000;\n}\n");
}

#[test]
fn duplicate_registration_keeps_the_first_plugin() {
    let mut engine = Engine::new();
    engine.use_plugin(color_case_plugin()).unwrap();
    engine.use_plugin(color_case_plugin()).unwrap();

    assert_eq!(engine.registry().len(), 1);
}

#[test]
fn width_option_materializes_as_indentation() {
    let engine = build_engine(json!({ "block-indent": 4 }));
    let plugin = engine.registry().lookup("block-indent").unwrap();
    assert_eq!(plugin.value(), Some(&json!("    ")));

    let formatted = engine
        .format_string("a {\ncolor: red;\n}", &Default::default())
        .unwrap();
    assert_eq!(formatted, "a {\n    color: red;\n}");
}

#[test]
fn tab_indent_is_accepted_by_pattern() {
    let engine = build_engine(json!({ "block-indent": "\t" }));

    let formatted = engine
        .format_string("a {\ncolor: red;\n}", &Default::default())
        .unwrap();
    assert_eq!(formatted, "a {\n\tcolor: red;\n}");
}

#[test]
fn bad_option_value_fails_configuration() {
    let mut engine = Engine::new();
    engine.use_plugin(block_indent_plugin()).unwrap();

    let err = engine
        .configure(&json!({ "block-indent": 2.5 }))
        .unwrap_err();
    assert!(err.to_string().contains("block-indent"));
    assert!(err.to_string().contains("integer"));
}
