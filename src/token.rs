use std::fmt;

use crate::location::Location;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier (`[A-Za-z_][A-Za-z0-9_]*`), including `true`/`false`/`null`.
    Identifier,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `#`
    Hash,
    /// `,`
    Comma,
    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// Decimal integer.
    Int,
    /// Hexadecimal integer (`0x1F` or `$1F`); value excludes the prefix.
    HexInt,
    /// Octal integer (`017`); value excludes the leading zero.
    OctalInt,
    /// Real number (`3.14`).
    Real,
    /// Four-character code (`'hfoo'`); value excludes the quotes.
    QuotedInt,
    /// Double-quoted string; value excludes the quotes, escapes kept raw.
    String,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `// ...` or `/* ... */`.
    Comment,
    /// Any single character no other rule claims.
    Other,
}

impl TokenKind {
    /// Fixed spelling of the kind, if it has one.
    #[must_use]
    pub const fn spelling(self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Hash => "#",
            Self::Comma => ",",
            Self::Assign => "=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Identifier
            | Self::Int
            | Self::HexInt
            | Self::OctalInt
            | Self::Real
            | Self::QuotedInt
            | Self::String
            | Self::Comment
            | Self::Other => return None,
        })
    }

    /// Whether the kind is a literal form.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Int | Self::HexInt | Self::OctalInt | Self::Real | Self::QuotedInt | Self::String
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(spelling) = self.spelling() {
            return write!(f, "'{spelling}'");
        }
        let name = match self {
            Self::Identifier => "identifier",
            Self::Int => "integer",
            Self::HexInt => "hex integer",
            Self::OctalInt => "octal integer",
            Self::Real => "real",
            Self::QuotedInt => "quoted integer",
            Self::String => "string",
            Self::Comment => "comment",
            _ => "character",
        };
        f.write_str(name)
    }
}

/// A single token with its kind, lexeme value, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<String>,
    pub loc: Location,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, value: Option<String>, loc: Location) -> Self {
        Self { kind, value, loc }
    }

    /// Value if present, otherwise the kind's fixed spelling.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value
            .as_deref()
            .or_else(|| self.kind.spelling())
            .unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::String, Some(v)) => write!(f, "\"{v}\""),
            (_, Some(v)) => write!(f, "'{v}'"),
            (kind, None) => write!(f, "{kind}"),
        }
    }
}
