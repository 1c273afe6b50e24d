//! Type-directed query generation.
//!
//! Walks an [`Expr`] and emits backend queries through a [`QueryBuilder`]. Each
//! comparison is resolved against the [`FieldConfig`]: the field's kind decides
//! how range operators are built, and its rename or group decides which backend
//! fields are searched.

use crate::{
    ast::{CompareOp, Expr, LogicalOp},
    builder::{Bounds, QueryBuilder},
    date::is_iso_date,
    error::GenerateError,
    field::{FieldConfig, FieldKind, FieldSpec},
};

/// Per-call generation context.
///
/// Borrows the configuration and builder for the duration of one walk, so
/// concurrent calls with different configurations never share state.
#[derive(Debug)]
pub struct Generator<'a, B> {
    /// Field configuration for this call.
    config: &'a FieldConfig,
    /// Backend query constructors.
    builder: &'a B,
}

impl<'a, B: QueryBuilder> Generator<'a, B> {
    /// Creates a generator over the given configuration and builder.
    pub fn new(config: &'a FieldConfig, builder: &'a B) -> Self {
        Self { config, builder }
    }

    /// Generates a backend query for the whole expression.
    ///
    /// The first failing comparison aborts generation.
    pub fn generate(&self, expr: &Expr) -> Result<B::Query, GenerateError> {
        match expr {
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let children = vec![self.generate(left)?, self.generate(right)?];
                Ok(match operator {
                    LogicalOp::And => self.builder.conjunction(children),
                    LogicalOp::Or => self.builder.disjunction(children),
                })
            }
            Expr::Comparison {
                field,
                operator,
                value,
            } => self.comparison(field, *operator, value),
        }
    }

    /// Generates the query for one comparison.
    fn comparison(
        &self,
        field: &str,
        operator: CompareOp,
        value: &str,
    ) -> Result<B::Query, GenerateError> {
        let spec = match self.config.get(field) {
            Some(spec) => Some(spec),
            None if self.config.is_strict() => {
                return Err(GenerateError::UnknownField {
                    field: field.to_string(),
                });
            }
            None => None,
        };
        let kind = spec.map_or(FieldKind::String, |spec| spec.kind);

        if let Some(paths) = spec.and_then(FieldSpec::group) {
            // Inequality over a group excludes a match on any path
            let (each, negate) = match operator {
                CompareOp::NotEq => (CompareOp::Eq, true),
                other => (other, false),
            };
            let children = paths
                .iter()
                .map(|path| self.target(field, path, kind, each, value))
                .collect::<Result<Vec<_>, _>>()?;
            let any = self.builder.disjunction(children);
            return Ok(if negate { self.builder.must_not(any) } else { any });
        }

        let backend = spec.map_or(field, |spec| spec.backend_field(field));
        self.target(field, backend, kind, operator, value)
    }

    /// Generates the query for one comparison against one backend field.
    fn target(
        &self,
        logical: &str,
        backend: &str,
        kind: FieldKind,
        operator: CompareOp,
        value: &str,
    ) -> Result<B::Query, GenerateError> {
        let Some(bounds) = Bounds::from_op(operator, value) else {
            let matched = self.builder.match_query(backend, value);
            return Ok(match operator {
                CompareOp::NotEq => self.builder.must_not(matched),
                _ => matched,
            });
        };

        let unsupported = || GenerateError::UnsupportedType {
            field: logical.to_string(),
            kind,
            value: value.to_string(),
        };

        match kind {
            FieldKind::Number => {
                let number = parse_number(value).ok_or_else(unsupported)?;
                Ok(self.builder.numeric_range(backend, bounds.map(|_| number)))
            }
            FieldKind::Date if is_iso_date(value) => Ok(self.builder.date_range(backend, bounds)),
            FieldKind::Date => Err(unsupported()),
            FieldKind::String => Ok(self.builder.term_range(backend, bounds)),
        }
    }
}

/// Parses a finite floating-point number.
fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
