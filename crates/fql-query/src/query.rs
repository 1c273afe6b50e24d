//! A backend-neutral query tree and the builder that produces it.
//!
//! [`Query`] mirrors the [`QueryBuilder`] constructors one-to-one. It serializes
//! to a tagged JSON shape that a search client can translate into its own DSL.

use std::{fmt, ops::Bound};

use serde::Serialize;

use crate::builder::{Bounds, QueryBuilder};

/// A generated search query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Field equals value.
    Match {
        /// Backend field.
        field: String,
        /// Value to match.
        value: String,
    },

    /// Excludes documents matching the inner query.
    MustNot {
        /// The excluded query.
        inner: Box<Self>,
    },

    /// Numeric range.
    NumericRange {
        /// Backend field.
        field: String,
        /// Lower bound, if any.
        min: Option<f64>,
        /// Upper bound, if any.
        max: Option<f64>,
        /// Whether `min` itself matches.
        min_inclusive: bool,
        /// Whether `max` itself matches.
        max_inclusive: bool,
    },

    /// Date range over ISO-8601 literals.
    DateRange {
        /// Backend field.
        field: String,
        /// Start of the range, if any.
        start: Option<String>,
        /// End of the range, if any.
        end: Option<String>,
        /// Whether `start` itself matches.
        start_inclusive: bool,
        /// Whether `end` itself matches.
        end_inclusive: bool,
    },

    /// Lexicographic range.
    TermRange {
        /// Backend field.
        field: String,
        /// Lower bound, if any.
        min: Option<String>,
        /// Upper bound, if any.
        max: Option<String>,
        /// Whether `min` itself matches.
        min_inclusive: bool,
        /// Whether `max` itself matches.
        max_inclusive: bool,
    },

    /// All children must match.
    Conjunction {
        /// Child queries.
        children: Vec<Self>,
    },

    /// At least one child must match.
    Disjunction {
        /// Child queries.
        children: Vec<Self>,
    },
}

impl Query {
    /// Formats the query as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Match { field, value } => writeln!(f, "{prefix}Match({field} = {value:?})"),
            Self::MustNot { inner } => {
                writeln!(f, "{prefix}MustNot")?;
                inner.fmt_tree(f, indent + 1)
            }
            Self::NumericRange {
                field,
                min,
                max,
                min_inclusive,
                max_inclusive,
            } => writeln!(
                f,
                "{prefix}NumericRange({field} {})",
                interval(min.as_ref(), max.as_ref(), *min_inclusive, *max_inclusive)
            ),
            Self::DateRange {
                field,
                start,
                end,
                start_inclusive,
                end_inclusive,
            } => writeln!(
                f,
                "{prefix}DateRange({field} {})",
                interval(start.as_ref(), end.as_ref(), *start_inclusive, *end_inclusive)
            ),
            Self::TermRange {
                field,
                min,
                max,
                min_inclusive,
                max_inclusive,
            } => writeln!(
                f,
                "{prefix}TermRange({field} {})",
                interval(min.as_ref(), max.as_ref(), *min_inclusive, *max_inclusive)
            ),
            Self::Conjunction { children } | Self::Disjunction { children } => {
                let name = if matches!(self, Self::Conjunction { .. }) {
                    "Conjunction"
                } else {
                    "Disjunction"
                };
                writeln!(f, "{prefix}{name}")?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Renders bounds in interval notation, with `*` for an open end: `(1000, *)`.
fn interval<T: fmt::Display>(
    lower: Option<&T>,
    upper: Option<&T>,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> String {
    let open = if lower_inclusive { '[' } else { '(' };
    let close = if upper_inclusive { ']' } else { ')' };
    let lower = lower.map_or_else(|| "*".to_string(), ToString::to_string);
    let upper = upper.map_or_else(|| "*".to_string(), ToString::to_string);
    format!("{open}{lower}, {upper}{close}")
}

/// Splits a bound into its value and inclusivity. Unbounded ends are exclusive.
fn split<T>(bound: Bound<T>) -> (Option<T>, bool) {
    match bound {
        Bound::Included(value) => (Some(value), true),
        Bound::Excluded(value) => (Some(value), false),
        Bound::Unbounded => (None, false),
    }
}

/// Builds [`Query`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTreeBuilder;

impl QueryBuilder for QueryTreeBuilder {
    type Query = Query;

    fn match_query(&self, field: &str, value: &str) -> Query {
        Query::Match {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    fn must_not(&self, inner: Query) -> Query {
        Query::MustNot {
            inner: Box::new(inner),
        }
    }

    fn numeric_range(&self, field: &str, bounds: Bounds<f64>) -> Query {
        let (min, min_inclusive) = split(bounds.lower);
        let (max, max_inclusive) = split(bounds.upper);
        Query::NumericRange {
            field: field.to_string(),
            min,
            max,
            min_inclusive,
            max_inclusive,
        }
    }

    fn date_range(&self, field: &str, bounds: Bounds<&str>) -> Query {
        let bounds = bounds.map(str::to_string);
        let (start, start_inclusive) = split(bounds.lower);
        let (end, end_inclusive) = split(bounds.upper);
        Query::DateRange {
            field: field.to_string(),
            start,
            end,
            start_inclusive,
            end_inclusive,
        }
    }

    fn term_range(&self, field: &str, bounds: Bounds<&str>) -> Query {
        let bounds = bounds.map(str::to_string);
        let (min, min_inclusive) = split(bounds.lower);
        let (max, max_inclusive) = split(bounds.upper);
        Query::TermRange {
            field: field.to_string(),
            min,
            max,
            min_inclusive,
            max_inclusive,
        }
    }

    fn conjunction(&self, children: Vec<Query>) -> Query {
        Query::Conjunction { children }
    }

    fn disjunction(&self, children: Vec<Query>) -> Query {
        Query::Disjunction { children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;

    #[test]
    fn numeric_range_from_bounds() {
        let query = QueryTreeBuilder.numeric_range(
            "file_size",
            Bounds::from_op(CompareOp::Gt, 1000.0).unwrap(),
        );
        assert_eq!(
            query,
            Query::NumericRange {
                field: "file_size".into(),
                min: Some(1000.0),
                max: None,
                min_inclusive: false,
                max_inclusive: false,
            }
        );
    }

    #[test]
    fn date_range_from_bounds() {
        let query = QueryTreeBuilder.date_range(
            "first_seen",
            Bounds::from_op(CompareOp::Le, "2023-01-01").unwrap(),
        );
        assert_eq!(
            query,
            Query::DateRange {
                field: "first_seen".into(),
                start: None,
                end: Some("2023-01-01".into()),
                start_inclusive: false,
                end_inclusive: true,
            }
        );
    }

    #[test]
    fn serializes_tagged() {
        let query = QueryTreeBuilder.disjunction(vec![
            QueryTreeBuilder.match_query("extension", "dll"),
            QueryTreeBuilder.must_not(QueryTreeBuilder.match_query("type", "pe")),
            QueryTreeBuilder.term_range("name", Bounds::from_op(CompareOp::Ge, "m").unwrap()),
        ]);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "disjunction",
                "children": [
                    {"type": "match", "field": "extension", "value": "dll"},
                    {"type": "must_not", "inner": {"type": "match", "field": "type", "value": "pe"}},
                    {
                        "type": "term_range",
                        "field": "name",
                        "min": "m",
                        "max": null,
                        "min_inclusive": true,
                        "max_inclusive": false
                    }
                ]
            })
        );
    }

    #[test]
    fn tree_display() {
        let query = QueryTreeBuilder.disjunction(vec![
            QueryTreeBuilder.match_query("extension", "dll"),
            QueryTreeBuilder.conjunction(vec![
                QueryTreeBuilder.match_query("type", "macho"),
                QueryTreeBuilder
                    .numeric_range("positives", Bounds::from_op(CompareOp::Gt, 10.0).unwrap()),
                QueryTreeBuilder
                    .date_range("first_seen", Bounds::from_op(CompareOp::Le, "2023-01-01").unwrap()),
            ]),
            QueryTreeBuilder.must_not(QueryTreeBuilder.match_query("tag", "upx")),
        ]);
        assert_eq!(
            query.to_string(),
            "Disjunction\n\
             \x20 Match(extension = \"dll\")\n\
             \x20 Conjunction\n\
             \x20   Match(type = \"macho\")\n\
             \x20   NumericRange(positives (10, *))\n\
             \x20   DateRange(first_seen (*, 2023-01-01])\n\
             \x20 MustNot\n\
             \x20   Match(tag = \"upx\")\n"
        );
    }
}
