//! Error types for filter parsing and query generation.
//!
//! Each stage has its own error enum. The public entry points wrap them in
//! [`QueryError`], which remembers the query text so it can point at the failure.

use std::{error, fmt};

use thiserror::Error;

use crate::field::FieldKind;

/// Syntax error raised by the parser. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended where a comparison or group had to start.
    #[error("unexpected end of input")]
    UnexpectedEnd {
        /// Byte offset of the end of input.
        position: usize,
    },

    /// A comparison field was not followed by a comparison operator.
    #[error("expected operator after {after}")]
    ExpectedOperator {
        /// The field literal preceding the missing operator.
        after: String,
        /// Byte offset where the operator was expected.
        position: usize,
    },

    /// A comparison operator was not followed by a value.
    #[error("expected value after operator")]
    ExpectedValue {
        /// Byte offset where the value was expected.
        position: usize,
    },

    /// An opening parenthesis was never closed.
    #[error("expected closing parenthesis")]
    UnclosedParen {
        /// Byte offset where the closing parenthesis was expected.
        position: usize,
    },

    /// Tokens remained after a complete expression.
    #[error("unexpected token '{token}'")]
    UnexpectedToken {
        /// The offending token's literal.
        token: String,
        /// Byte offset of the token.
        position: usize,
    },

    /// The lexer could not classify part of the input.
    #[error("illegal token '{token}'")]
    IllegalToken {
        /// The offending text.
        token: String,
        /// Byte offset of the token.
        position: usize,
    },

    /// Parenthesized groups are nested past the parser's limit.
    #[error("parentheses nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The deepest nesting accepted.
        limit: usize,
        /// Byte offset of the first group past the limit.
        position: usize,
    },

    /// The filter holds more comparisons than the parser accepts.
    #[error("filter has more than {limit} comparisons")]
    TooManyComparisons {
        /// The most comparisons accepted.
        limit: usize,
        /// Byte offset of the first comparison past the limit.
        position: usize,
    },

    /// A size literal does not fit in an unsigned 64-bit integer.
    #[error("numeric value out of range: {literal}")]
    NumberOutOfRange {
        /// The literal including its unit, as written.
        literal: String,
        /// Byte offset of the literal.
        position: usize,
    },
}

impl ParseError {
    /// Byte offset in the input where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedEnd { position }
            | Self::ExpectedOperator { position, .. }
            | Self::ExpectedValue { position }
            | Self::UnclosedParen { position }
            | Self::UnexpectedToken { position, .. }
            | Self::IllegalToken { position, .. }
            | Self::NestingTooDeep { position, .. }
            | Self::TooManyComparisons { position, .. }
            | Self::NumberOutOfRange { position, .. } => *position,
        }
    }
}

/// Semantic error raised while generating a backend query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A range value does not fit the field's declared kind.
    #[error("unsupported type for field: {field}")]
    UnsupportedType {
        /// Logical field name.
        field: String,
        /// Declared kind of the field.
        kind: FieldKind,
        /// The rejected value.
        value: String,
    },

    /// The field is not configured and the configuration is strict.
    #[error("unknown field: {field}")]
    UnknownField {
        /// Logical field name.
        field: String,
    },
}

/// A unified error type for filter compilation.
///
/// Carries the original query string so the display can echo it with a
/// position indicator and a hint for common mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Invalid syntax.
    Parse(ParseError),
    /// Invalid semantics for the field configuration.
    Generate(GenerateError),
}

impl QueryError {
    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        match &self.kind {
            QueryErrorKind::Parse(err) => err.to_string(),
            QueryErrorKind::Generate(err) => err.to_string(),
        }
    }

    /// Byte offset of the failure in the query, when known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Parse(err) => Some(err.position()),
            QueryErrorKind::Generate(_) => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.kind {
            QueryErrorKind::Parse(ParseError::UnclosedParen { .. }) => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            QueryErrorKind::Parse(ParseError::ExpectedOperator { .. }) => {
                Some("Comparisons need an operator: = != < <= > >=, e.g. 'type=pe'")
            }
            QueryErrorKind::Parse(ParseError::ExpectedValue { .. }) => {
                Some("Put a value after the operator, quoting it if it contains spaces or digits")
            }
            QueryErrorKind::Parse(
                ParseError::NestingTooDeep { .. } | ParseError::TooManyComparisons { .. },
            ) => Some("Split the filter into smaller ones or drop redundant parentheses"),
            QueryErrorKind::Parse(ParseError::IllegalToken { token, .. })
                if token.starts_with('"') =>
            {
                Some("Add a closing quote (\") to complete the value")
            }
            QueryErrorKind::Generate(GenerateError::UnsupportedType {
                kind: FieldKind::Number,
                ..
            }) => Some("Number fields compare against numeric values, e.g. 'size>1000'"),
            QueryErrorKind::Generate(GenerateError::UnsupportedType {
                kind: FieldKind::Date,
                ..
            }) => Some("Date fields compare against ISO-8601 dates, e.g. '2023-01-31' or '2023-01-31T12:00Z'"),
            QueryErrorKind::Generate(GenerateError::UnknownField { .. }) => {
                Some("Only configured fields may be used; run 'fql fields' to list them")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Parse(_) => "query syntax error",
            QueryErrorKind::Generate(_) => "query error",
        };

        writeln!(f, "{}: {}", prefix, self.message())?;

        // If we have a query and position, show it with a pointer
        if let Some(query) = &self.query {
            writeln!(f, "  {}", query)?;
            if let Some(pos) = self.position() {
                let clamped = pos.min(query.len());
                let column = query
                    .get(..clamped)
                    .map_or(clamped, |head| head.chars().count());
                writeln!(f, "  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {}", suggestion)?;
        }

        Ok(())
    }
}

impl error::Error for QueryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            QueryErrorKind::Parse(err) => Some(err),
            QueryErrorKind::Generate(err) => Some(err),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse(err),
            query: None,
        }
    }
}

impl From<GenerateError> for QueryError {
    fn from(err: GenerateError) -> Self {
        Self {
            kind: QueryErrorKind::Generate(err),
            query: None,
        }
    }
}
