//! Query lexer (tokenizer).
//!
//! Converts a filter expression into a stream of tokens for the parser. The lexer
//! never fails: characters it cannot classify become [`TokenKind::Illegal`] tokens
//! and the parser decides what to do with them.

use std::{
    iter::{FusedIterator, Peekable},
    str::Chars,
};

use crate::{
    date::is_iso_date,
    token::{Token, TokenKind},
};

/// Size unit suffixes and their decimal multipliers.
const SIZE_UNITS: [(&str, u64); 4] = [
    ("kb", 1_000),
    ("mb", 1_000_000),
    ("gb", 1_000_000_000),
    ("tb", 1_000_000_000_000),
];

/// Single-pass scanner over a filter expression.
///
/// Yields tokens lazily and ends with exactly one [`TokenKind::EndOfInput`].
pub struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
    /// Set once the end-of-input token has been produced.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            finished: false,
        }
    }

    /// Scans the next token.
    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(&ch) = self.chars.peek() else {
            return Token::new(TokenKind::EndOfInput, "", start);
        };

        match ch {
            c if is_ident_char(c) => self.read_identifier(),
            c if c.is_ascii_digit() => self.read_number(),
            '"' => self.read_quoted(),
            '=' => self.read_operator('=', TokenKind::Eq, TokenKind::Assign),
            '!' => self.read_operator('=', TokenKind::NotEq, TokenKind::Illegal),
            '<' => self.read_operator('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.read_operator('=', TokenKind::Ge, TokenKind::Gt),
            '(' => {
                self.advance();
                Token::new(TokenKind::LParen, "(", start)
            }
            ')' => {
                self.advance();
                Token::new(TokenKind::RParen, ")", start)
            }
            other => {
                self.advance();
                Token::new(TokenKind::Illegal, other.to_string(), start)
            }
        }
    }

    /// Reads a one- or two-character operator.
    ///
    /// Produces `two` if the current character is followed by `second`, else `one`.
    fn read_operator(&mut self, second: char, two: TokenKind, one: TokenKind) -> Token {
        let start = self.position;
        self.advance();
        if self.chars.peek() == Some(&second) {
            self.advance();
        }
        let literal = &self.input[start..self.position];
        let kind = if literal.len() == 2 { two } else { one };
        Token::new(kind, literal, start)
    }

    /// Reads an identifier, keyword (AND, OR) or size unit.
    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while self.chars.peek().is_some_and(|&c| is_ident_char(c)) {
            self.advance();
        }
        let word = &self.input[start..self.position];

        let kind = if word.eq_ignore_ascii_case("and") {
            TokenKind::And
        } else if word.eq_ignore_ascii_case("or") {
            TokenKind::Or
        } else if unit_factor(word).is_some() {
            TokenKind::Unit
        } else {
            TokenKind::Ident
        };

        Token::new(kind, word, start)
    }

    /// Reads an integer, or a date if the digit run continues into an ISO-8601 shape.
    ///
    /// A tail that does not form a date is left unconsumed.
    fn read_number(&mut self) -> Token {
        let start = self.position;
        while self.chars.peek().is_some_and(char::is_ascii_digit) {
            self.advance();
        }
        let digits_end = self.position;

        if matches!(self.chars.peek(), Some('-' | 'T')) {
            let checkpoint = (self.chars.clone(), self.position);
            while self.chars.peek().is_some_and(|&c| is_date_tail_char(c)) {
                self.advance();
            }
            let candidate = &self.input[start..self.position];
            if is_iso_date(candidate) {
                return Token::new(TokenKind::Date, candidate, start);
            }
            (self.chars, self.position) = checkpoint;
        }

        Token::new(TokenKind::Int, &self.input[start..digits_end], start)
    }

    /// Reads a double-quoted string. The literal excludes the quotes.
    ///
    /// An unterminated quote becomes an `Illegal` token holding the rest of the input.
    fn read_quoted(&mut self) -> Token {
        let start = self.position;
        self.advance(); // consume opening quote
        let content_start = self.position;

        loop {
            match self.chars.peek() {
                Some('"') => {
                    let content = &self.input[content_start..self.position];
                    self.advance(); // consume closing quote
                    return Token::new(TokenKind::Ident, content, start);
                }
                Some(_) => self.advance(),
                None => {
                    return Token::new(TokenKind::Illegal, &self.input[start..], start);
                }
            }
        }
    }

    /// Skips spaces, tabs and line breaks.
    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_end() {
            self.finished = true;
        }
        Some(token)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Characters that start and continue an identifier.
fn is_ident_char(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '.'
}

/// Characters that may follow a digit run in a date literal.
fn is_date_tail_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | 'T' | ':' | 'Z' | '+')
}

/// Multiplier for a size unit suffix, matched case-insensitively.
pub fn unit_factor(unit: &str) -> Option<u64> {
    SIZE_UNITS
        .iter()
        .find(|(name, _)| unit.eq_ignore_ascii_case(name))
        .map(|&(_, factor)| factor)
}

/// Tokenizes a filter expression into a vector ending with `EndOfInput`.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}
