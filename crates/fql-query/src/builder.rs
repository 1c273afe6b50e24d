//! The capability interface a search backend implements.
//!
//! The generator only ever constructs queries through [`QueryBuilder`], so a new
//! backend is supported by implementing these seven constructors.

use std::ops::Bound;

use crate::ast::CompareOp;

/// Lower and upper bounds of a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    /// Lower bound.
    pub lower: Bound<T>,
    /// Upper bound.
    pub upper: Bound<T>,
}

impl<T> Bounds<T> {
    /// Builds the half-open range described by `field <op> value`.
    ///
    /// Returns `None` for `=` and `!=`, which are not ranges.
    pub fn from_op(op: CompareOp, value: T) -> Option<Self> {
        let (lower, upper) = match op {
            CompareOp::Gt => (Bound::Excluded(value), Bound::Unbounded),
            CompareOp::Ge => (Bound::Included(value), Bound::Unbounded),
            CompareOp::Lt => (Bound::Unbounded, Bound::Excluded(value)),
            CompareOp::Le => (Bound::Unbounded, Bound::Included(value)),
            CompareOp::Eq | CompareOp::NotEq => return None,
        };
        Some(Self { lower, upper })
    }

    /// Converts both bound values.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Bounds<U> {
        Bounds {
            lower: self.lower.map(&mut f),
            upper: self.upper.map(&mut f),
        }
    }
}

/// Constructors a search backend provides for generated queries.
pub trait QueryBuilder {
    /// The backend's query type.
    type Query;

    /// Field equals value.
    fn match_query(&self, field: &str, value: &str) -> Self::Query;

    /// Documents that do not match `inner`.
    fn must_not(&self, inner: Self::Query) -> Self::Query;

    /// Numeric range over `field`.
    fn numeric_range(&self, field: &str, bounds: Bounds<f64>) -> Self::Query;

    /// Date range over `field`. Bound values are ISO-8601 literals.
    fn date_range(&self, field: &str, bounds: Bounds<&str>) -> Self::Query;

    /// Lexicographic range over `field`.
    fn term_range(&self, field: &str, bounds: Bounds<&str>) -> Self::Query;

    /// All children must match.
    fn conjunction(&self, children: Vec<Self::Query>) -> Self::Query;

    /// At least one child must match.
    fn disjunction(&self, children: Vec<Self::Query>) -> Self::Query;
}
