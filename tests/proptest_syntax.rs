//! Property-based tests with proptest.
//!
//! The tokenizer must be total (every input either tokenizes or returns a
//! `LexError`, never panics) and deterministic. Generated expressions must
//! parse, and formatting them must preserve the tree and be idempotent.

mod common;

use common::parse_one;
use jass_syntax::{TokenKind, format, format_tree, tokenize};
use proptest::prelude::*;

const RESERVED: &[&str] = &["and", "or", "not", "true", "false", "null"];

// -- Leaf strategies --

fn ident() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,7}".prop_filter("reserved word", |s| !RESERVED.contains(&s.as_str()))
}

fn literal() -> impl Strategy<Value = (String, TokenKind)> {
    prop_oneof![
        "[1-9][0-9]{0,8}".prop_map(|s| (s, TokenKind::Int)),
        "0x[0-9a-fA-F]{1,8}".prop_map(|s| (s, TokenKind::HexInt)),
        "0[0-7]{1,8}".prop_map(|s| (s, TokenKind::OctalInt)),
        "[1-9][0-9]{0,4}\\.[0-9]{1,4}".prop_map(|s| (s, TokenKind::Real)),
        "'[a-zA-Z0-9]{4}'".prop_map(|s| (s, TokenKind::QuotedInt)),
        "\"([a-zA-Z0-9 .,]|\\\\[ntr\"\\\\]){0,12}\"".prop_map(|s| (s, TokenKind::String)),
    ]
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => literal().prop_map(|(s, _)| s),
        2 => ident(),
        1 => prop::sample::select(vec!["true", "false", "null"]).prop_map(str::to_string),
    ]
}

fn binary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "or", "and", ">", ">=", "<", "<=", "==", "!=", "+", "-", "*", "/",
    ])
}

fn unary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["-", "+", "not "])
}

/// Expression source with every compound operand parenthesized, so any
/// combination of operators is grammatical.
fn expression() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), binary_op(), inner.clone())
                .prop_map(|(l, op, r)| format!("({l}) {op} ({r})")),
            (unary_op(), inner.clone()).prop_map(|(op, e)| format!("{op}({e})")),
            (ident(), prop::collection::vec(inner.clone(), 0..=3))
                .prop_map(|(name, args)| format!("{name}({})", args.join(", "))),
            (ident(), inner).prop_map(|(name, index)| format!("{name}[{index}]")),
        ]
    })
}

proptest! {
    #[test]
    fn tokenize_never_panics(input in "\\PC{0,64}") {
        let _ = tokenize(&input);
    }

    #[test]
    fn tokenize_is_deterministic(input in "[ -~\\n]{0,64}") {
        prop_assert_eq!(tokenize(&input), tokenize(&input));
    }

    #[test]
    fn token_locations_are_ordered(input in "[ -~\\n]{0,64}") {
        if let Ok(tokens) = tokenize(&input) {
            let mut last_end = 0;
            for token in &tokens {
                prop_assert!(token.loc.start <= token.loc.end);
                prop_assert!(token.loc.start >= last_end);
                prop_assert!(token.loc.slice(&input).is_some());
                last_end = token.loc.end;
            }
        }
    }

    #[test]
    fn literal_value_is_within_its_slice((text, kind) in literal()) {
        let tokens = tokenize(&text).expect("literal should tokenize");
        prop_assert_eq!(tokens.len(), 1);
        let token = &tokens[0];
        prop_assert_eq!(token.kind, kind);
        prop_assert_eq!(token.loc.slice(&text), Some(text.as_str()));
        let value = token.value.as_deref().expect("literal has a value");
        prop_assert!(text.contains(value));
    }

    #[test]
    fn format_preserves_tree_and_is_idempotent(src in expression()) {
        let ast = parse_one(&src);
        let formatted = format(&ast);
        let reparsed = parse_one(&formatted);
        prop_assert_eq!(format_tree(&ast), format_tree(&reparsed));
        prop_assert_eq!(format(&reparsed), formatted);
    }

    #[test]
    fn parent_links_match_children(src in expression()) {
        let ast = parse_one(&src);
        prop_assert_eq!(ast.parent(ast.root()), None);
        prop_assert_eq!(ast.descendants().len(), ast.len());
        for id in ast.descendants() {
            let loc = ast.node(id).loc;
            for child in ast.children(id) {
                prop_assert_eq!(ast.parent(child), Some(id));
                let child_loc = ast.node(child).loc;
                prop_assert!(loc.start <= child_loc.start && child_loc.end <= loc.end);
            }
        }
    }
}
