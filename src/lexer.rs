use std::fmt;

use log::{debug, trace};

use crate::location::{LineIndex, Location, Position};
use crate::token::{Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Double-quoted string never closed.
    UnterminatedString,
    /// Backslash followed by a character that is not a known escape.
    InvalidEscape(char),
    /// Quoted integer never closed.
    UnterminatedQuotedInt,
    /// Non-alphanumeric character inside a quoted integer.
    InvalidQuotedIntCharacter(char),
    /// `/*` without a matching `*/`.
    UnterminatedBlockComment,
    /// `0x` not followed by any hex digit.
    EmptyHexLiteral,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::InvalidEscape(ch) => write!(f, "invalid escape sequence: \\{ch}"),
            Self::UnterminatedQuotedInt => write!(f, "unterminated quoted integer"),
            Self::InvalidQuotedIntCharacter(ch) => {
                write!(f, "invalid character in quoted integer: {ch:?}")
            }
            Self::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            Self::EmptyHexLiteral => write!(f, "hex literal has no digits"),
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset where scanning stopped.
    pub offset: usize,
    pub position: Position,
}

/// Tokenize a JASS source buffer.
///
/// Whitespace is skipped; comments are kept as [`TokenKind::Comment`]
/// tokens (see [`strip_comments`]). Any character no rule claims becomes a
/// single [`TokenKind::Other`] token rather than an error.
///
/// # Errors
///
/// Returns `LexError` on unterminated strings, quoted integers, or block
/// comments, invalid escapes, and malformed quoted integers or hex literals.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

/// Copy of `tokens` without comment tokens, ready for the parser.
#[must_use]
pub fn strip_comments(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .cloned()
        .collect()
}

struct Lexer<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let pos = if source.starts_with('\u{FEFF}') { 3 } else { 0 };
        Self {
            source,
            input: source.as_bytes(),
            pos,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let token = match ch {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.pos += 1;
                    continue;
                }
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.read_identifier(),
                b'0'..=b'9' => self.read_number()?,
                b'"' => self.read_string()?,
                b'\'' => self.read_quoted_int()?,
                b'$' if self.peek_at(1).is_some_and(|b| b.is_ascii_hexdigit()) => {
                    self.read_dollar_hex()
                }
                b'/' if self.peek_at(1) == Some(b'/') => self.read_line_comment(),
                b'/' if self.peek_at(1) == Some(b'*') => self.read_block_comment()?,
                b'>' if self.peek_at(1) == Some(b'=') => self.pair(TokenKind::Ge),
                b'<' if self.peek_at(1) == Some(b'=') => self.pair(TokenKind::Le),
                b'=' if self.peek_at(1) == Some(b'=') => self.pair(TokenKind::Eq),
                b'!' if self.peek_at(1) == Some(b'=') => self.pair(TokenKind::Ne),
                _ => match single_char_kind(ch) {
                    Some(kind) => self.single(kind),
                    None => self.read_other(),
                },
            };
            trace!("token {:?} at {}", token.kind, token.loc);
            tokens.push(token);
        }

        debug!(
            "tokenized {} bytes into {} tokens",
            self.input.len(),
            tokens.len()
        );
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn char_at(&self, offset: usize) -> char {
        self.source[offset..].chars().next().unwrap_or_default()
    }

    fn error(&self, kind: LexErrorKind, offset: usize) -> LexError {
        debug!("lex error at offset {offset}: {kind}");
        LexError {
            kind,
            offset,
            position: LineIndex::new(self.source).position(offset),
        }
    }

    /// Token ending at the cursor whose value is `source[value_start..value_end]`.
    fn lexeme(&self, kind: TokenKind, start: usize, value_start: usize, value_end: usize) -> Token {
        Token::new(
            kind,
            Some(self.source[value_start..value_end].to_string()),
            Location::new(start, self.pos),
        )
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        Token::new(kind, None, Location::new(start, self.pos))
    }

    fn pair(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 2;
        Token::new(kind, None, Location::new(start, self.pos))
    }

    fn read_other(&mut self) -> Token {
        let start = self.pos;
        self.pos += self.char_at(start).len_utf8();
        self.lexeme(TokenKind::Other, start, start, self.pos)
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.pos;
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');

        let keyword = match &self.source[start..self.pos] {
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "not" => Some(TokenKind::Not),
            _ => None,
        };
        match keyword {
            Some(kind) => Token::new(kind, None, Location::new(start, self.pos)),
            None => self.lexeme(TokenKind::Identifier, start, start, self.pos),
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.pos;

        if self.input[start] == b'0' {
            match self.peek_at(1) {
                Some(b'x' | b'X') => {
                    self.pos += 2;
                    let digits = self.pos;
                    self.eat_while(|b| b.is_ascii_hexdigit());
                    if self.pos == digits {
                        return Err(self.error(LexErrorKind::EmptyHexLiteral, start));
                    }
                    return Ok(self.lexeme(TokenKind::HexInt, start, digits, self.pos));
                }
                Some(b'0'..=b'7') => {
                    self.pos += 1;
                    let digits = self.pos;
                    self.eat_while(|b| matches!(b, b'0'..=b'7'));
                    return Ok(self.lexeme(TokenKind::OctalInt, start, digits, self.pos));
                }
                _ => {}
            }
        }

        self.eat_while(|b| b.is_ascii_digit());

        // `3.` stays an integer; the dot becomes its own token
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
            self.eat_while(|b| b.is_ascii_digit());
            return Ok(self.lexeme(TokenKind::Real, start, start, self.pos));
        }

        Ok(self.lexeme(TokenKind::Int, start, start, self.pos))
    }

    fn read_dollar_hex(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        let digits = self.pos;
        self.eat_while(|b| b.is_ascii_hexdigit());
        self.lexeme(TokenKind::HexInt, start, digits, self.pos)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        let body = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error(LexErrorKind::UnterminatedString, start)),
                Some(b'\\') => match self.peek_at(1) {
                    Some(b'n' | b't' | b'r' | b'b' | b'f' | b'"' | b'\\') => self.pos += 2,
                    Some(_) => {
                        let ch = self.char_at(self.pos + 1);
                        return Err(self.error(LexErrorKind::InvalidEscape(ch), self.pos));
                    }
                    None => return Err(self.error(LexErrorKind::UnterminatedString, start)),
                },
                Some(b'"') => break,
                Some(_) => self.pos += 1,
            }
        }

        let end = self.pos;
        self.pos += 1; // skip closing quote
        Ok(self.lexeme(TokenKind::String, start, body, end))
    }

    fn read_quoted_int(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        self.pos += 1;
        let body = self.pos;

        loop {
            match self.peek() {
                None => return Err(self.error(LexErrorKind::UnterminatedQuotedInt, start)),
                Some(b'\'') => break,
                Some(b) if b.is_ascii_alphanumeric() => self.pos += 1,
                Some(_) => {
                    let ch = self.char_at(self.pos);
                    return Err(
                        self.error(LexErrorKind::InvalidQuotedIntCharacter(ch), self.pos)
                    );
                }
            }
        }

        let end = self.pos;
        self.pos += 1;
        Ok(self.lexeme(TokenKind::QuotedInt, start, body, end))
    }

    fn read_line_comment(&mut self) -> Token {
        let start = self.pos;
        self.eat_while(|b| b != b'\n' && b != b'\r');
        self.lexeme(TokenKind::Comment, start, start, self.pos)
    }

    fn read_block_comment(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        match self.source[start + 2..].find("*/") {
            Some(rel) => {
                self.pos = start + 2 + rel + 2;
                Ok(self.lexeme(TokenKind::Comment, start, start, self.pos))
            }
            None => Err(self.error(LexErrorKind::UnterminatedBlockComment, start)),
        }
    }
}

const fn single_char_kind(ch: u8) -> Option<TokenKind> {
    Some(match ch {
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'*' => TokenKind::Star,
        b'/' => TokenKind::Slash,
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'[' => TokenKind::LBracket,
        b']' => TokenKind::RBracket,
        b'#' => TokenKind::Hash,
        b',' => TokenKind::Comma,
        b'=' => TokenKind::Assign,
        b'>' => TokenKind::Gt,
        b'<' => TokenKind::Lt,
        _ => return None,
    })
}
