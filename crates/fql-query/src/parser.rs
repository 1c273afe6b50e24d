//! Filter parser.
//!
//! Parses a token stream into an [`Expr`] using recursive descent with one token
//! of lookahead.
//!
//! # Grammar
//!
//! ```text
//! expr       → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → unit ("AND" unit | unit)*
//! unit       → "(" expr ")" | comparison
//! comparison → value comparator value
//! value      → IDENT | INT [UNIT] | DATE | UNIT
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. AND (explicit keyword, or implicit before an identifier or group)
//! 3. OR (explicit keyword)
//!
//! Both connectives are left-associative.
//!
//! # Limits
//!
//! Groups nest at most [`MAX_NESTING_DEPTH`] deep and one filter holds at most
//! [`MAX_COMPARISONS`] comparisons. Both bound the depth of the resulting tree,
//! which every later stage walks recursively.

use crate::{
    ast::{CompareOp, Expr},
    error::ParseError,
    lexer::unit_factor,
    token::{Token, TokenKind},
};

/// Deepest accepted nesting of parenthesized groups.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Most comparisons accepted in one filter.
pub const MAX_COMPARISONS: usize = 256;

/// Recursive descent parser for filter expressions.
pub struct Parser {
    /// Token stream to parse. Always ends with an end-of-input token.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Groups currently open.
    depth: usize,
    /// Comparisons parsed so far.
    comparisons: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    ///
    /// A stream that does not end with [`TokenKind::EndOfInput`] gets one appended.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            let end = tokens
                .last()
                .map_or(0, |token| token.position + token.literal.len());
            tokens.push(Token::new(TokenKind::EndOfInput, "", end));
        }
        Self {
            tokens,
            position: 0,
            depth: 0,
            comparisons: 0,
        }
    }

    /// Parses the whole token stream into an expression.
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.expression()?;
        self.finish()?;
        Ok(expr)
    }

    /// Parses one complete expression, leaving any trailing tokens unconsumed.
    pub fn expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Checks that every token has been consumed.
    pub fn finish(&self) -> Result<(), ParseError> {
        let token = self.current();
        if token.is_end() {
            Ok(())
        } else if token.kind == TokenKind::Illegal {
            Err(illegal(token))
        } else {
            Err(ParseError::UnexpectedToken {
                token: token.literal.clone(),
                position: token.position,
            })
        }
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(TokenKind::Or) {
            self.advance(); // consume OR
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }

        Ok(left)
    }

    /// Parses: and_expr → unit ("AND" unit | unit)*
    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unit()?;

        loop {
            match self.current().kind {
                TokenKind::And => self.advance(),
                // Adjacent units are implicitly joined with AND
                TokenKind::Ident | TokenKind::LParen => {}
                _ => break,
            }
            let right = self.parse_unit()?;
            left = Expr::and(left, right);
        }

        Ok(left)
    }

    /// Parses: unit → "(" expr ")" | comparison
    fn parse_unit(&mut self) -> Result<Expr, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::LParen => {
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(ParseError::NestingTooDeep {
                        limit: MAX_NESTING_DEPTH,
                        position: token.position,
                    });
                }
                self.depth += 1;
                self.advance(); // consume (
                let inner = self.parse_or()?;
                self.depth -= 1;

                let close = self.current();
                match close.kind {
                    TokenKind::RParen => {}
                    TokenKind::Illegal => return Err(illegal(close)),
                    _ => {
                        return Err(ParseError::UnclosedParen {
                            position: close.position,
                        });
                    }
                }
                self.advance(); // consume )
                Ok(inner)
            }
            TokenKind::EndOfInput => Err(ParseError::UnexpectedEnd {
                position: token.position,
            }),
            TokenKind::Illegal => Err(illegal(token)),
            kind if kind.is_value() => self.parse_comparison(),
            _ => Err(ParseError::UnexpectedToken {
                token: token.literal.clone(),
                position: token.position,
            }),
        }
    }

    /// Parses: comparison → value comparator value
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        if self.comparisons == MAX_COMPARISONS {
            return Err(ParseError::TooManyComparisons {
                limit: MAX_COMPARISONS,
                position: self.current().position,
            });
        }
        self.comparisons += 1;

        let field = self.parse_value()?;

        let token = self.current();
        let operator = match CompareOp::from_token(token.kind) {
            Some(operator) => operator,
            None if token.kind == TokenKind::Illegal => return Err(illegal(token)),
            None => {
                return Err(ParseError::ExpectedOperator {
                    after: field,
                    position: token.position,
                });
            }
        };
        self.advance();

        let token = self.current();
        match token.kind {
            TokenKind::Illegal => Err(illegal(token)),
            kind if kind.is_value() => {
                let value = self.parse_value()?;
                Ok(Expr::Comparison {
                    field,
                    operator,
                    value,
                })
            }
            _ => Err(ParseError::ExpectedValue {
                position: token.position,
            }),
        }
    }

    /// Consumes a value token, folding an integer and its size unit into one literal.
    ///
    /// The caller has checked that the current token is a value.
    fn parse_value(&mut self) -> Result<String, ParseError> {
        let token = self.current().clone();
        self.advance();

        if token.kind != TokenKind::Int || !self.check(TokenKind::Unit) {
            return Ok(token.literal);
        }
        let unit = self.current().clone();
        let Some(factor) = unit_factor(&unit.literal) else {
            return Ok(token.literal);
        };
        self.advance();

        token
            .literal
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(factor))
            .map(|n| n.to_string())
            .ok_or_else(|| ParseError::NumberOutOfRange {
                literal: format!("{}{}", token.literal, unit.literal),
                position: token.position,
            })
    }

    /// Returns the current token, or the end-of-input token once exhausted.
    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    /// Checks if the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Error for an illegal token found where the grammar expected something else.
fn illegal(token: &Token) -> ParseError {
    ParseError::IllegalToken {
        token: token.literal.clone(),
        position: token.position,
    }
}

/// Parses a token stream into an expression.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::lexer::tokenize;

    fn parse(input: &str) -> Result<Expr, ParseError> {
        parse_tokens(tokenize(input))
    }

    fn cmp(field: &str, op: CompareOp, value: &str) -> Expr {
        Expr::comparison(field, op, value)
    }

    fn eq(field: &str, value: &str) -> Expr {
        cmp(field, CompareOp::Eq, value)
    }

    #[test]
    fn simple_comparison() {
        assert_eq!(parse("type=pe").unwrap(), eq("type", "pe"));
    }

    #[test]
    fn all_comparators() {
        let cases = [
            ("a=1", CompareOp::Eq),
            ("a==1", CompareOp::Eq),
            ("a!=1", CompareOp::NotEq),
            ("a<1", CompareOp::Lt),
            ("a<=1", CompareOp::Le),
            ("a>1", CompareOp::Gt),
            ("a>=1", CompareOp::Ge),
        ];
        for (input, op) in cases {
            assert_eq!(parse(input).unwrap(), cmp("a", op, "1"), "{input}");
        }
    }

    #[test]
    fn quoted_value() {
        assert_eq!(
            parse("name=\"hello world\"").unwrap(),
            eq("name", "hello world")
        );
    }

    #[test]
    fn date_value() {
        assert_eq!(
            parse("first_seen>=2023-01-01T10:00Z").unwrap(),
            cmp("first_seen", CompareOp::Ge, "2023-01-01T10:00Z")
        );
    }

    #[test]
    fn size_units_are_expanded() {
        assert_eq!(
            parse("size>=1000kb").unwrap(),
            cmp("size", CompareOp::Ge, "1000000")
        );
        assert_eq!(parse("size<5mb").unwrap(), cmp("size", CompareOp::Lt, "5000000"));
        assert_eq!(
            parse("size>3GB").unwrap(),
            cmp("size", CompareOp::Gt, "3000000000")
        );
        assert_eq!(
            parse("size<=2tb").unwrap(),
            cmp("size", CompareOp::Le, "2000000000000")
        );
    }

    #[test]
    fn bare_unit_is_a_value() {
        assert_eq!(parse("unit=kb").unwrap(), eq("unit", "kb"));
    }

    #[test]
    fn unit_overflow_is_an_error() {
        let err = parse("size>99999999999tb").unwrap_err();
        assert_eq!(
            err,
            ParseError::NumberOutOfRange {
                literal: "99999999999tb".into(),
                position: 5,
            }
        );
        assert_eq!(err.to_string(), "numeric value out of range: 99999999999tb");
    }

    #[test]
    fn oversized_digit_run_with_unit_is_an_error() {
        let err = parse("size>99999999999999999999kb").unwrap_err();
        assert!(matches!(err, ParseError::NumberOutOfRange { .. }));
    }

    #[test]
    fn oversized_digit_run_without_unit_is_kept() {
        assert_eq!(
            parse("size>99999999999999999999").unwrap(),
            cmp("size", CompareOp::Gt, "99999999999999999999")
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("type=pe AND tag=upx OR size>1000").unwrap(),
            Expr::or(
                Expr::and(eq("type", "pe"), eq("tag", "upx")),
                cmp("size", CompareOp::Gt, "1000")
            )
        );
    }

    #[test]
    fn implicit_and() {
        assert_eq!(
            parse("type=pe OR tag=upx size>1000").unwrap(),
            Expr::or(
                eq("type", "pe"),
                Expr::and(eq("tag", "upx"), cmp("size", CompareOp::Gt, "1000"))
            )
        );
    }

    #[test]
    fn implicit_and_before_group() {
        assert_eq!(
            parse("type=pe (tag=upx OR tag=aspack)").unwrap(),
            Expr::and(
                eq("type", "pe"),
                Expr::or(eq("tag", "upx"), eq("tag", "aspack"))
            )
        );
    }

    #[test]
    fn connectives_fold_left() {
        assert_eq!(
            parse("a=1 OR b=2 OR c=3").unwrap(),
            Expr::or(Expr::or(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
        assert_eq!(
            parse("a=1 b=2 AND c=3").unwrap(),
            Expr::and(Expr::and(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(
            parse("extension=dll or (type=macho and positives>10)").unwrap(),
            Expr::or(
                eq("extension", "dll"),
                Expr::and(eq("type", "macho"), cmp("positives", CompareOp::Gt, "10"))
            )
        );
        assert_eq!(
            parse("(a=1 OR b=2) AND c=3").unwrap(),
            Expr::and(Expr::or(eq("a", "1"), eq("b", "2")), eq("c", "3"))
        );
    }

    #[test]
    fn redundant_grouping_changes_shape() {
        let flat = parse("a=1 AND b=2 AND c=3").unwrap();
        let grouped = parse("a=1 AND (b=2 AND c=3)").unwrap();
        assert_ne!(flat, grouped);
        assert_eq!(flat.comparison_count(), grouped.comparison_count());
    }

    #[test]
    fn nested_groups() {
        assert_eq!(parse("((a=1))").unwrap(), eq("a", "1"));
    }

    #[test]
    fn error_empty_input() {
        assert_eq!(
            parse("").unwrap_err(),
            ParseError::UnexpectedEnd { position: 0 }
        );
        assert_eq!(
            parse("   ").unwrap_err(),
            ParseError::UnexpectedEnd { position: 3 }
        );
    }

    #[test]
    fn error_missing_operator() {
        let err = parse("type").unwrap_err();
        assert_eq!(err.to_string(), "expected operator after type");
        assert_eq!(err.position(), 4);

        let err = parse("type pe").unwrap_err();
        assert_eq!(err.to_string(), "expected operator after type");
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn error_missing_value() {
        let err = parse("type=").unwrap_err();
        assert_eq!(err, ParseError::ExpectedValue { position: 5 });
        assert_eq!(err.to_string(), "expected value after operator");

        let err = parse("type=)").unwrap_err();
        assert_eq!(err, ParseError::ExpectedValue { position: 5 });
    }

    #[test]
    fn error_unclosed_paren() {
        let err = parse("(type=pe").unwrap_err();
        assert_eq!(err, ParseError::UnclosedParen { position: 8 });
        assert_eq!(err.to_string(), "expected closing parenthesis");
    }

    #[test]
    fn error_or_at_end() {
        assert_eq!(
            parse("type=pe OR").unwrap_err(),
            ParseError::UnexpectedEnd { position: 10 }
        );
    }

    #[test]
    fn error_or_at_start() {
        assert_eq!(
            parse("OR type=pe").unwrap_err(),
            ParseError::UnexpectedToken {
                token: "OR".into(),
                position: 0,
            }
        );
    }

    #[test]
    fn error_stray_closing_paren() {
        let err = parse("type=pe)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                token: ")".into(),
                position: 7,
            }
        );
        assert_eq!(err.to_string(), "unexpected token ')'");
    }

    #[test]
    fn error_illegal_tokens() {
        assert_eq!(
            parse("type=&").unwrap_err(),
            ParseError::IllegalToken {
                token: "&".into(),
                position: 5,
            }
        );
        assert_eq!(
            parse("type!pe").unwrap_err(),
            ParseError::IllegalToken {
                token: "!".into(),
                position: 4,
            }
        );
        let err = parse("name=\"open").unwrap_err();
        assert_eq!(err.to_string(), "illegal token '\"open'");
    }

    #[test]
    fn leftover_tokens_after_expression() {
        let mut parser = Parser::new(tokenize("size>not-a-number"));
        assert_eq!(
            parser.expression().unwrap(),
            cmp("size", CompareOp::Gt, "not")
        );
        assert_eq!(
            parser.finish().unwrap_err(),
            ParseError::IllegalToken {
                token: "-".into(),
                position: 8,
            }
        );
    }

    #[test]
    fn illegal_token_after_comparison() {
        assert_eq!(
            parse("(a=1 ]").unwrap_err(),
            ParseError::IllegalToken {
                token: "]".into(),
                position: 5,
            }
        );
        assert_eq!(
            parse("a=1 &").unwrap_err(),
            ParseError::IllegalToken {
                token: "&".into(),
                position: 4,
            }
        );
        assert_eq!(parse("a=1 &").unwrap_err().to_string(), "illegal token '&'");
    }

    /// `n` groups wrapped around a single comparison.
    fn nested(n: usize) -> String {
        format!("{}a=1{}", "(".repeat(n), ")".repeat(n))
    }

    #[test]
    fn nesting_up_to_limit_is_accepted() {
        assert_eq!(parse(&nested(MAX_NESTING_DEPTH)).unwrap(), eq("a", "1"));
    }

    #[test]
    fn nesting_past_limit_is_rejected() {
        let err = parse(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position: MAX_NESTING_DEPTH,
            }
        );
        assert_eq!(err.to_string(), "parentheses nested deeper than 128 levels");

        // Far past the limit fails the same way instead of exhausting the stack
        assert!(matches!(
            parse(&nested(5000)).unwrap_err(),
            ParseError::NestingTooDeep { position: 128, .. }
        ));
    }

    #[test]
    fn sibling_groups_do_not_accumulate_depth() {
        let group = nested(MAX_NESTING_DEPTH);
        let input = format!("{group} OR {group} {group}");
        assert_eq!(parse(&input).unwrap().comparison_count(), 3);
    }

    #[test]
    fn comparison_chains_are_bounded() {
        let at_limit = "a=1 ".repeat(MAX_COMPARISONS);
        assert_eq!(
            parse(&at_limit).unwrap().comparison_count(),
            MAX_COMPARISONS
        );

        let err = parse(&"a=1 ".repeat(MAX_COMPARISONS + 1)).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooManyComparisons {
                limit: MAX_COMPARISONS,
                position: MAX_COMPARISONS * 4,
            }
        );
        assert_eq!(err.to_string(), "filter has more than 256 comparisons");

        let ors = vec!["a=1"; 5000].join(" OR ");
        assert!(matches!(
            parse(&ors).unwrap_err(),
            ParseError::TooManyComparisons { .. }
        ));
    }

    #[test]
    fn missing_end_token_is_supplied() {
        let tokens = vec![
            Token::new(TokenKind::Ident, "a", 0),
            Token::new(TokenKind::Assign, "=", 1),
        ];
        assert_eq!(
            parse_tokens(tokens).unwrap_err(),
            ParseError::ExpectedValue { position: 2 }
        );
        assert_eq!(
            parse_tokens(Vec::new()).unwrap_err(),
            ParseError::UnexpectedEnd { position: 0 }
        );
    }

    #[test]
    fn query_string_round_trip() {
        let inputs = [
            "type=pe AND tag=upx OR size>1000",
            "extension=dll or (type=macho and positives>10)",
            "name!=\"hello world\" first_seen<2023-01-01",
            "a=1 AND (b=2 AND (c=3 OR d=4))",
        ];
        for input in inputs {
            let expr = parse(input).unwrap();
            assert_eq!(parse(&expr.to_query_string()).unwrap(), expr, "{input}");
        }
    }

    #[test]
    fn performance_many_queries() {
        let queries = [
            "type=pe",
            "type=pe AND tag=upx OR size>1000",
            "extension=dll or (type=macho and positives>10)",
            "size>=1000kb first_seen>=2023-01-01T00:00:00Z",
            "((a=1 OR b=2) c=3) OR ((d=4 OR e=5) f=6)",
        ];

        let start = Instant::now();
        for _ in 0..2000 {
            for query in &queries {
                parse(query).unwrap();
            }
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 2000,
            "Parsing 10,000 queries took {elapsed:?}, expected < 2s"
        );
    }
}
