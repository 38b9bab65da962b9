//! Renders an expression AST back into text.
//!
//! [`format`] produces canonical JASS source with single spaces around binary
//! operators and only the parentheses the grammar needs. [`format_tree`]
//! produces an s-expression showing the tree shape.

use std::fmt::Write as _;

use crate::ast::{Ast, BinaryOp, Literal, NodeId, NodeKind, UnaryOp};

/// Format an expression as canonical source text.
///
/// Hex literals are always written with `0x`, so `$FF` becomes `0xFF`.
/// Parsing the output again yields a tree that formats to the same text.
#[must_use]
pub fn format(ast: &Ast) -> String {
    let mut out = String::new();
    format_node(&mut out, ast, ast.root());
    out
}

/// Format an expression as an s-expression, e.g. `(+ 1 (* 2 3))`.
#[must_use]
pub fn format_tree(ast: &Ast) -> String {
    let mut out = String::new();
    format_tree_node(&mut out, ast, ast.root());
    out
}

fn format_node(out: &mut String, ast: &Ast, id: NodeId) {
    match ast.kind(id) {
        NodeKind::Literal(literal) => format_literal(out, literal),
        NodeKind::Name(name) => out.push_str(name),
        NodeKind::Call { name, args } => {
            out.push_str(name);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                format_node(out, ast, *arg);
            }
            out.push(')');
        }
        NodeKind::Index { name, index } => {
            out.push_str(name);
            out.push('[');
            format_node(out, ast, *index);
            out.push(']');
        }
        NodeKind::Unary { op, operand } => {
            out.push_str(op.as_str());
            if *op == UnaryOp::Not {
                out.push(' ');
            }
            let wrap = binary_op(ast, *operand).is_some();
            format_operand(out, ast, *operand, wrap);
        }
        NodeKind::Binary { op, left, right } => {
            let prec = op.precedence();
            // Comparisons never chain, so a comparison operand of a
            // comparison is always wrapped.
            let wrap_left = binary_op(ast, *left).is_some_and(|l| {
                l.precedence() < prec || (op.is_relational() && l.is_relational())
            });
            let wrap_right = binary_op(ast, *right).is_some_and(|r| r.precedence() <= prec);

            format_operand(out, ast, *left, wrap_left);
            let _ = write!(out, " {op} ");
            format_operand(out, ast, *right, wrap_right);
        }
    }
}

fn format_operand(out: &mut String, ast: &Ast, id: NodeId, wrap: bool) {
    if wrap {
        out.push('(');
        format_node(out, ast, id);
        out.push(')');
    } else {
        format_node(out, ast, id);
    }
}

fn binary_op(ast: &Ast, id: NodeId) -> Option<BinaryOp> {
    match ast.kind(id) {
        NodeKind::Binary { op, .. } => Some(*op),
        _ => None,
    }
}

fn format_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Int {
            original, radix, ..
        } => {
            let prefix = match radix {
                16 => "0x",
                8 => "0",
                _ => "",
            };
            out.push_str(prefix);
            out.push_str(original);
        }
        Literal::Real { original, .. } | Literal::Boolean { original, .. } => {
            out.push_str(original);
        }
        Literal::String { original, .. } => {
            let _ = write!(out, "\"{original}\"");
        }
        Literal::QuotedInt { code, .. } => {
            let _ = write!(out, "'{code}'");
        }
        Literal::Null => out.push_str("null"),
    }
}

fn format_tree_node(out: &mut String, ast: &Ast, id: NodeId) {
    match ast.kind(id) {
        NodeKind::Literal(literal) => format_literal(out, literal),
        NodeKind::Name(name) => out.push_str(name),
        NodeKind::Unary { op, operand } => {
            let _ = write!(out, "({op} ");
            format_tree_node(out, ast, *operand);
            out.push(')');
        }
        NodeKind::Binary { op, left, right } => {
            let _ = write!(out, "({op} ");
            format_tree_node(out, ast, *left);
            out.push(' ');
            format_tree_node(out, ast, *right);
            out.push(')');
        }
        NodeKind::Call { name, args } => {
            let _ = write!(out, "(call {name}");
            for arg in args {
                out.push(' ');
                format_tree_node(out, ast, *arg);
            }
            out.push(')');
        }
        NodeKind::Index { name, index } => {
            let _ = write!(out, "(index {name} ");
            format_tree_node(out, ast, *index);
            out.push(')');
        }
    }
}
