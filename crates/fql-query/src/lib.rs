//! Filter language compiler for search backends.
//!
//! Compiles short filter expressions into structured search queries:
//!
//! - **Comparisons**: `type=pe`, `tag!=upx`, `size>=1000`, `first_seen<2023-01-01`
//! - **Connectives**: `a=1 AND b=2`, `a=1 OR b=2`, and implicit AND between
//!   adjacent comparisons
//! - **Grouping**: `extension=dll or (type=macho and positives>10)`
//! - **Size units**: `5mb` becomes `5000000` (decimal `kb`, `mb`, `gb`, `tb`)
//! - **Quoting**: `name="hello world"` for values with spaces or digits
//!
//! Generation is driven by a [`FieldConfig`] that gives each field a kind
//! (string, number or date), an optional backend name and an optional group of
//! backend fields. Queries are built through the [`QueryBuilder`] trait, so any
//! backend can be targeted; [`QueryTreeBuilder`] produces a serializable [`Query`].
//!
//! # Example
//!
//! ```
//! use fql_query::{FieldConfig, FieldSpec, Query, generate};
//!
//! let config = FieldConfig::new().with_field("size", FieldSpec::number().with_field("file_size"));
//! let query = generate("size>1kb", &config).unwrap();
//! assert_eq!(
//!     query,
//!     Query::NumericRange {
//!         field: "file_size".into(),
//!         min: Some(1000.0),
//!         max: None,
//!         min_inclusive: false,
//!         max_inclusive: false,
//!     }
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod builder;
mod date;
mod error;
mod field;
mod generate;
mod lexer;
mod parser;
mod query;
mod token;

pub use ast::{CompareOp, Expr, LogicalOp};
pub use builder::{Bounds, QueryBuilder};
pub use date::is_iso_date;
pub use error::{GenerateError, ParseError, QueryError, QueryErrorKind};
pub use field::{FieldConfig, FieldKind, FieldSpec};
pub use generate::Generator;
pub use lexer::{Lexer, tokenize};
pub use parser::{MAX_COMPARISONS, MAX_NESTING_DEPTH, Parser, parse_tokens};
pub use query::{Query, QueryTreeBuilder};
pub use token::{Token, TokenKind};

/// Parses a filter expression into an AST.
pub fn parse(input: &str) -> Result<Expr, QueryError> {
    parse_tokens(tokenize(input)).map_err(|err| QueryError::from(err).with_query(input))
}

/// Generates a query tree for an already parsed expression.
pub fn compile(expr: &Expr, config: &FieldConfig) -> Result<Query, QueryError> {
    Generator::new(config, &QueryTreeBuilder)
        .generate(expr)
        .map_err(|err| QueryError::from(err).with_query(expr.to_query_string()))
}

/// Compiles a filter expression into a [`Query`] tree.
pub fn generate(input: &str, config: &FieldConfig) -> Result<Query, QueryError> {
    generate_with(input, config, &QueryTreeBuilder)
}

/// Compiles a filter expression through a custom [`QueryBuilder`].
///
/// Tokens left over after a complete expression are reported only once the
/// expression itself has generated cleanly.
pub fn generate_with<B: QueryBuilder>(
    input: &str,
    config: &FieldConfig,
    builder: &B,
) -> Result<B::Query, QueryError> {
    let run = || -> Result<B::Query, QueryError> {
        let mut parser = Parser::new(tokenize(input));
        let expr = parser.expression()?;
        let query = Generator::new(config, builder).generate(&expr)?;
        parser.finish()?;
        Ok(query)
    };
    run().map_err(|err| err.with_query(input))
}
