#![allow(dead_code)]

use jass_syntax::{Ast, format, format_tree, parse_expression, strip_comments, tokenize};

/// Tokenize, drop comments, and parse exactly one expression.
pub fn parse_one(input: &str) -> Ast {
    let tokens = strip_comments(&tokenize(input).expect("tokenize failed"));
    parse_expression(&tokens).expect("parse failed")
}

/// S-expression of the single expression in `input`.
pub fn tree(input: &str) -> String {
    format_tree(&parse_one(input))
}

/// Assert `input` formats to `expected` and that formatting is stable.
pub fn assert_formats_to(input: &str, expected: &str) {
    let output = format(&parse_one(input));
    assert_eq!(
        output, expected,
        "format mismatch:\n--- input ---\n{input}\n--- got ---\n{output}"
    );
    let again = format(&parse_one(&output));
    assert_eq!(
        again, output,
        "format not idempotent:\n--- first ---\n{output}\n--- second ---\n{again}"
    );
}
