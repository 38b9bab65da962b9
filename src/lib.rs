//! Tokenizer and expression parser for the JASS scripting language.
//!
//! Source text is turned into tokens with exact byte spans, and token
//! streams are turned into expression trees using a precedence-climbing
//! parser (`or` < `and` < comparisons < `+ -` < `* /` < unary < primary).
//!
//! # Quick start
//!
//! ```
//! use jass_syntax::{format, format_tree, parse_str};
//!
//! let exprs = parse_str("1+2 * 3 // trailing comment").unwrap();
//! assert_eq!(exprs.len(), 1);
//! assert_eq!(format_tree(&exprs[0].ast), "(+ 1 (* 2 3))");
//! assert_eq!(format(&exprs[0].ast), "1 + 2 * 3");
//! ```
//!
//! ## Tokens and spans
//!
//! ```
//! use jass_syntax::{TokenKind, tokenize};
//!
//! let src = "x >= 0x1F";
//! let tokens = tokenize(src).unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Ge);
//! assert_eq!(tokens[2].kind, TokenKind::HexInt);
//! assert_eq!(tokens[2].value.as_deref(), Some("1F"));
//! assert_eq!(tokens[2].loc.slice(src), Some("0x1F"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod formatter;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod token;

pub use ast::{Ast, BinaryOp, Literal, Node, NodeId, NodeKind, UnaryOp};
pub use formatter::{format, format_tree};
pub use lexer::{LexError, LexErrorKind, strip_comments, tokenize};
pub use location::{LineIndex, Location, Position};
pub use parser::{
    DEFAULT_MAX_DEPTH, ExpressionResult, ParseOptions, SyntaxError, SyntaxErrorKind, parse,
    parse_expression, parse_with,
};
pub use token::{Token, TokenKind};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

impl Error {
    /// Byte offset the error points at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(e) => e.offset,
            Self::Syntax(e) => e.loc.start,
        }
    }
}

/// Tokenize `input`, drop comments, and parse every expression in it.
pub fn parse_str(input: &str) -> Result<Vec<ExpressionResult>, Error> {
    let tokens = strip_comments(&tokenize(input)?);
    Ok(parse(&tokens)?)
}
