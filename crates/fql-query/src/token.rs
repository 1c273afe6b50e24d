//! Token vocabulary shared by the lexer and parser.

use std::fmt;

use serde::Serialize;

/// The closed set of token kinds in the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// A character (or unterminated quote) the lexer could not classify.
    Illegal,
    /// End of input. Always the last token of a sequence.
    EndOfInput,
    /// A run of decimal digits.
    Int,
    /// A bare word or the contents of a quoted string.
    Ident,
    /// An ISO-8601 date or datetime literal.
    Date,
    /// A size unit suffix: `kb`, `mb`, `gb` or `tb`.
    Unit,
    /// `=`
    Assign,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// The `AND` keyword.
    And,
    /// The `OR` keyword.
    Or,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl TokenKind {
    /// Returns true for tokens that can stand in a comparison's field or value slot.
    pub fn is_value(self) -> bool {
        matches!(self, Self::Ident | Self::Int | Self::Date | Self::Unit)
    }

    /// Returns true for comparison operator tokens, including the `==` alias.
    pub fn is_comparator(self) -> bool {
        matches!(
            self,
            Self::Assign | Self::Eq | Self::NotEq | Self::Lt | Self::Gt | Self::Le | Self::Ge
        )
    }

    /// Human-readable name used in error messages and token listings.
    pub fn name(self) -> &'static str {
        match self {
            Self::Illegal => "ILLEGAL",
            Self::EndOfInput => "EOF",
            Self::Int => "INT",
            Self::Ident => "IDENT",
            Self::Date => "DATE",
            Self::Unit => "UNIT",
            Self::Assign => "=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::LParen => "(",
            Self::RParen => ")",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The literal text. Quoted strings carry their contents without the quotes.
    pub literal: String,
    /// Byte offset of the token's first character in the input.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            position,
        }
    }

    /// Returns true if this is the end-of-input marker.
    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => f.write_str("EOF"),
            kind => write!(f, "{kind}({:?})", self.literal),
        }
    }
}
