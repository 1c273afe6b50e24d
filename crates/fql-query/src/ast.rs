//! Filter expression abstract syntax tree.
//!
//! Represents parsed filter expressions before generation into backend queries.

use std::fmt;

use serde::Serialize;

use crate::{date::is_iso_date, token::TokenKind};

/// A comparison operator.
///
/// `==` in the source is accepted as an alias and normalized to [`CompareOp::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// `=`
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
}

impl CompareOp {
    /// Maps a comparator token to its operator.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Assign | TokenKind::Eq => Some(Self::Eq),
            TokenKind::NotEq => Some(Self::NotEq),
            TokenKind::Lt => Some(Self::Lt),
            TokenKind::Gt => Some(Self::Gt),
            TokenKind::Le => Some(Self::Le),
            TokenKind::Ge => Some(Self::Ge),
            _ => None,
        }
    }

    /// The token kind this operator is written with.
    pub fn token_kind(self) -> TokenKind {
        match self {
            Self::Eq => TokenKind::Assign,
            Self::NotEq => TokenKind::NotEq,
            Self::Lt => TokenKind::Lt,
            Self::Gt => TokenKind::Gt,
            Self::Le => TokenKind::Le,
            Self::Ge => TokenKind::Ge,
        }
    }

    /// The operator as written in query text.
    pub fn symbol(self) -> &'static str {
        self.token_kind().name()
    }

    /// Returns true for `<`, `<=`, `>` and `>=`.
    pub fn is_range(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A boolean connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    /// Both sides must match.
    And,
    /// Either side must match.
    Or,
}

impl LogicalOp {
    /// The token kind this connective is written with.
    pub fn token_kind(self) -> TokenKind {
        match self {
            Self::And => TokenKind::And,
            Self::Or => TokenKind::Or,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_kind().name())
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// A leaf comparison such as `size>1000`.
    Comparison {
        /// Field name as written in the query.
        field: String,
        /// Comparison operator.
        operator: CompareOp,
        /// Value as written, after size-unit normalization.
        value: String,
    },

    /// Two sub-expressions joined by `AND` or `OR`.
    Binary {
        /// Left operand.
        left: Box<Self>,
        /// The connective.
        operator: LogicalOp,
        /// Right operand.
        right: Box<Self>,
    },
}

impl Expr {
    /// Creates a comparison leaf.
    pub fn comparison(field: impl Into<String>, operator: CompareOp, value: impl Into<String>) -> Self {
        Self::Comparison {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a binary node.
    pub fn binary(left: Self, operator: LogicalOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Creates an `AND` node.
    pub fn and(left: Self, right: Self) -> Self {
        Self::binary(left, LogicalOp::And, right)
    }

    /// Creates an `OR` node.
    pub fn or(left: Self, right: Self) -> Self {
        Self::binary(left, LogicalOp::Or, right)
    }

    /// Number of comparison leaves in the tree.
    pub fn comparison_count(&self) -> usize {
        match self {
            Self::Comparison { .. } => 1,
            Self::Binary { left, right, .. } => left.comparison_count() + right.comparison_count(),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Comparison {
                field,
                operator,
                value,
            } => writeln!(f, "{prefix}Comparison({field} {operator} {value:?})"),
            Self::Binary {
                left,
                operator,
                right,
            } => {
                writeln!(f, "{prefix}{operator}")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression as canonical query text.
    ///
    /// Nested binary nodes are parenthesized, so parsing the output reproduces
    /// this exact tree: `(type=pe AND tag=upx) OR size>1000`.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Comparison {
                field,
                operator,
                value,
            } => format!("{}{operator}{}", render_literal(field), render_literal(value)),
            Self::Binary {
                left,
                operator,
                right,
            } => format!(
                "{} {operator} {}",
                left.fmt_operand(),
                right.fmt_operand()
            ),
        }
    }

    /// Renders a binary operand, grouping it if it is itself binary.
    fn fmt_operand(&self) -> String {
        match self {
            Self::Comparison { .. } => self.to_query_string(),
            Self::Binary { .. } => format!("({})", self.to_query_string()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Renders a field or value so that it lexes back to the same literal.
fn render_literal(literal: &str) -> String {
    let bare_word = !literal.is_empty()
        && literal
            .chars()
            .all(|c| c.is_alphabetic() || c == '_' || c == '.')
        && !["and", "or", "kb", "mb", "gb", "tb"]
            .iter()
            .any(|reserved| literal.eq_ignore_ascii_case(reserved));
    let bare_number = !literal.is_empty() && literal.chars().all(|c| c.is_ascii_digit());

    if bare_word || bare_number || is_iso_date(literal) {
        literal.to_string()
    } else {
        format!("\"{literal}\"")
    }
}
