use std::fmt;

use log::debug;

use crate::ast::{Ast, AstBuilder, BinaryOp, Literal, NodeId, NodeKind, UnaryOp};
use crate::location::Location;
use crate::token::{Token, TokenKind};

/// Classifies a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// No expression can start at this token (or the input ended).
    ExpectedExpression,
    /// A specific token was required, such as a closing `)`.
    Expected(TokenKind),
    /// A second relational operator, as in `a < b < c`.
    ChainedComparison,
    /// Literal text that does not convert to a value, such as an integer
    /// that overflows.
    InvalidLiteral(String),
    /// Nesting exceeded [`ParseOptions::max_depth`].
    NestingTooDeep(usize),
    /// Tokens left over after a single expression.
    TrailingInput,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedExpression => write!(f, "expected expression"),
            Self::Expected(kind) => write!(f, "expected {kind}"),
            Self::ChainedComparison => {
                write!(f, "comparison operators cannot be chained")
            }
            Self::InvalidLiteral(text) => write!(f, "invalid literal '{text}'"),
            Self::NestingTooDeep(max) => {
                write!(f, "expression nested deeper than {max} levels")
            }
            Self::TrailingInput => write!(f, "unexpected token after expression"),
        }
    }
}

/// Error produced during parsing.
///
/// `token` is the offending token, or `None` when the input ran out; in that
/// case `loc` is an empty location just past the last token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub token: Option<Token>,
    pub loc: Location,
}

impl SyntaxError {
    /// Whether the error was raised at end of input.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{}, found {token} at {}", self.kind, self.loc),
            None => write!(f, "{}, found end of input at {}", self.kind, self.loc),
        }
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parentheses, unary operators, and call or index
    /// arguments. Each parenthesis or argument level recurses through every
    /// precedence level, so raising this far past the default can exhaust a
    /// 2 MiB thread stack in debug builds.
    pub max_depth: usize,
}

/// Nesting allowed by [`ParseOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// One top-level expression and the tokens it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionResult {
    pub tokens: Vec<Token>,
    pub ast: Ast,
}

impl ExpressionResult {
    /// Span from the first to the last consumed token.
    #[must_use]
    pub fn loc(&self) -> Location {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.loc.cover(&last.loc),
            _ => Location::default(),
        }
    }

    /// The exact source text of the expression, comments and whitespace
    /// included.
    #[must_use]
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.loc().slice(source)
    }
}

/// Parse every expression in `tokens`, one after another, until the tokens
/// run out.
///
/// Comment tokens are not skipped; remove them first with
/// [`strip_comments`](crate::lexer::strip_comments). An empty slice yields no
/// expressions.
///
/// # Errors
///
/// Returns the first `SyntaxError`; no partial results are returned.
pub fn parse(tokens: &[Token]) -> Result<Vec<ExpressionResult>, SyntaxError> {
    parse_with(tokens, ParseOptions::default())
}

/// [`parse`] with explicit options.
pub fn parse_with(
    tokens: &[Token],
    options: ParseOptions,
) -> Result<Vec<ExpressionResult>, SyntaxError> {
    Parser::new(tokens, options).parse_all()
}

/// Parse exactly one expression spanning all of `tokens`.
///
/// # Errors
///
/// Fails like [`parse`], and also on empty input or leftover tokens.
pub fn parse_expression(tokens: &[Token]) -> Result<Ast, SyntaxError> {
    let mut parser = Parser::new(tokens, ParseOptions::default());
    let ast = parser.expression()?;
    if parser.peek().is_some() {
        return Err(parser.error_here(SyntaxErrorKind::TrailingInput));
    }
    Ok(ast)
}

type Production<'a> = fn(&mut Parser<'a>) -> Result<NodeId, SyntaxError>;

const OR_OPS: &[(TokenKind, BinaryOp)] = &[(TokenKind::Or, BinaryOp::Or)];
const AND_OPS: &[(TokenKind, BinaryOp)] = &[(TokenKind::And, BinaryOp::And)];
const RELATIONAL_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Gt, BinaryOp::Gt),
    (TokenKind::Ge, BinaryOp::Ge),
    (TokenKind::Lt, BinaryOp::Lt),
    (TokenKind::Le, BinaryOp::Le),
    (TokenKind::Eq, BinaryOp::Eq),
    (TokenKind::Ne, BinaryOp::Ne),
];
const SUM_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Plus, BinaryOp::Add),
    (TokenKind::Minus, BinaryOp::Sub),
];
const PRODUCT_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
];

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    options: ParseOptions,
    depth: usize,
    nodes: AstBuilder,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
            depth: 0,
            nodes: AstBuilder::default(),
        }
    }

    fn parse_all(mut self) -> Result<Vec<ExpressionResult>, SyntaxError> {
        let mut results = Vec::new();

        while self.pos < self.tokens.len() {
            let start = self.pos;
            let ast = self.expression()?;
            let tokens = self.tokens[start..self.pos].to_vec();
            let result = ExpressionResult { tokens, ast };
            debug!(
                "parsed expression {} at {} ({} nodes)",
                results.len(),
                result.loc(),
                result.ast.len()
            );
            results.push(result);
        }

        Ok(results)
    }

    /// One complete expression as its own tree.
    fn expression(&mut self) -> Result<Ast, SyntaxError> {
        self.nodes = AstBuilder::default();
        let root = self.logical_or()?;
        Ok(std::mem::take(&mut self.nodes).finish(root))
    }

    fn logical_or(&mut self) -> Result<NodeId, SyntaxError> {
        self.left_assoc(OR_OPS, Self::logical_and)
    }

    fn logical_and(&mut self) -> Result<NodeId, SyntaxError> {
        self.left_assoc(AND_OPS, Self::relational)
    }

    /// At most one comparison; a second one is an error rather than the
    /// start of the next expression.
    fn relational(&mut self) -> Result<NodeId, SyntaxError> {
        let start = self.pos;
        let left = self.sum()?;
        let Some(op) = self.peek_op(RELATIONAL_OPS) else {
            return Ok(left);
        };
        self.pos += 1;
        let right = self.sum()?;
        if self.peek_op(RELATIONAL_OPS).is_some() {
            return Err(self.error_here(SyntaxErrorKind::ChainedComparison));
        }
        let loc = self.span_from(start);
        Ok(self.nodes.push(NodeKind::Binary { op, left, right }, loc))
    }

    fn sum(&mut self) -> Result<NodeId, SyntaxError> {
        self.left_assoc(SUM_OPS, Self::product)
    }

    fn product(&mut self) -> Result<NodeId, SyntaxError> {
        self.left_assoc(PRODUCT_OPS, Self::unary)
    }

    fn unary(&mut self) -> Result<NodeId, SyntaxError> {
        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Not) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Minus,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            _ => return self.primary(),
        };
        let start = self.pos;
        self.pos += 1;
        let operand = self.nested(Self::unary)?;
        let loc = self.span_from(start);
        Ok(self.nodes.push(NodeKind::Unary { op, operand }, loc))
    }

    fn primary(&mut self) -> Result<NodeId, SyntaxError> {
        let Some(token) = self.peek() else {
            return Err(self.error_here(SyntaxErrorKind::ExpectedExpression));
        };
        let start = self.pos;

        match token.kind {
            kind if kind.is_literal() => {
                let literal = convert_literal(token).map_err(|kind| self.error_here(kind))?;
                self.pos += 1;
                Ok(self.push_literal(literal, start))
            }
            TokenKind::Identifier => match token.text() {
                "true" | "false" => {
                    let original = token.text().to_string();
                    let value = original == "true";
                    self.pos += 1;
                    Ok(self.push_literal(Literal::Boolean { original, value }, start))
                }
                "null" => {
                    self.pos += 1;
                    Ok(self.push_literal(Literal::Null, start))
                }
                name => {
                    self.pos += 1;
                    self.identifier(name.to_string(), start)
                }
            },
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.nested(Self::logical_or)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.error_here(SyntaxErrorKind::ExpectedExpression)),
        }
    }

    /// Name reference, call, or index, with the name already consumed.
    fn identifier(&mut self, name: String, start: usize) -> Result<NodeId, SyntaxError> {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let mut args = Vec::new();
                if !self.at(TokenKind::RParen) {
                    loop {
                        args.push(self.nested(Self::logical_or)?);
                        if !self.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RParen)?;
                let loc = self.span_from(start);
                Ok(self.nodes.push(NodeKind::Call { name, args }, loc))
            }
            Some(TokenKind::LBracket) => {
                self.pos += 1;
                let index = self.nested(Self::logical_or)?;
                self.expect(TokenKind::RBracket)?;
                let loc = self.span_from(start);
                Ok(self.nodes.push(NodeKind::Index { name, index }, loc))
            }
            _ => {
                let loc = self.span_from(start);
                Ok(self.nodes.push(NodeKind::Name(name), loc))
            }
        }
    }

    /// `operand (op operand)*`, folded to the left.
    fn left_assoc(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
        operand: Production<'a>,
    ) -> Result<NodeId, SyntaxError> {
        let start = self.pos;
        let mut left = operand(self)?;
        while let Some(op) = self.peek_op(ops) {
            self.pos += 1;
            let right = operand(self)?;
            let loc = self.span_from(start);
            left = self.nodes.push(NodeKind::Binary { op, left, right }, loc);
        }
        Ok(left)
    }

    fn nested(&mut self, production: Production<'a>) -> Result<NodeId, SyntaxError> {
        if self.depth >= self.options.max_depth {
            return Err(self.error_here(SyntaxErrorKind::NestingTooDeep(self.options.max_depth)));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn push_literal(&mut self, literal: Literal, start: usize) -> NodeId {
        let loc = self.span_from(start);
        self.nodes.push(NodeKind::Literal(literal), loc)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let matched = self.at(kind);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error_here(SyntaxErrorKind::Expected(kind)))
        }
    }

    fn peek_op(&self, ops: &[(TokenKind, BinaryOp)]) -> Option<BinaryOp> {
        let kind = self.peek()?.kind;
        ops.iter().find(|(k, _)| *k == kind).map(|&(_, op)| op)
    }

    /// Location covering the tokens consumed since `start`.
    fn span_from(&self, start: usize) -> Location {
        let first = &self.tokens[start];
        let last = &self.tokens[self.pos - 1];
        first.loc.cover(&last.loc)
    }

    fn error_here(&self, kind: SyntaxErrorKind) -> SyntaxError {
        let token = self.peek().cloned();
        let loc = token.as_ref().map_or_else(|| self.eof_loc(), |t| t.loc);
        debug!("syntax error at {loc}: {kind}");
        SyntaxError { kind, token, loc }
    }

    fn eof_loc(&self) -> Location {
        self.tokens
            .last()
            .map_or_else(Location::default, |t| Location::point(t.loc.end))
    }
}

fn convert_literal(token: &Token) -> Result<Literal, SyntaxErrorKind> {
    let original = token.text().to_string();

    let literal = match token.kind {
        TokenKind::Int | TokenKind::OctalInt | TokenKind::HexInt => {
            let radix = match token.kind {
                TokenKind::OctalInt => 8,
                TokenKind::HexInt => 16,
                _ => 10,
            };
            let value = i64::from_str_radix(&original, radix).map_err(|_| invalid(&original))?;
            Literal::Int {
                original,
                radix,
                value,
            }
        }
        TokenKind::Real => {
            let value = original.parse::<f64>().map_err(|_| invalid(&original))?;
            Literal::Real { original, value }
        }
        TokenKind::String => Literal::String {
            value: unescape(&original),
            original,
        },
        TokenKind::QuotedInt => Literal::QuotedInt {
            original: format!("'{original}'"),
            code: original,
        },
        _ => return Err(invalid(&original)),
    };
    Ok(literal)
}

fn invalid(text: &str) -> SyntaxErrorKind {
    SyntaxErrorKind::InvalidLiteral(text.to_string())
}

/// Resolve backslash escapes in raw string contents. Unknown escapes are
/// kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some(other @ ('"' | '\\')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
