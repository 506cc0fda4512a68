//! Predicate compilation into parameterized SQL conditions.
//!
//! Two backends share one walk over the predicate mapping: the mutation
//! backend pushes conditions into any [`QueryBuilder`], the string backend
//! returns a standalone WHERE clause with positional arguments. Both emit
//! identical fragments for the same input.

use std::collections::HashMap;

use super::error::{SearchError, SearchResult};
use super::value::{CompareOp, Scalar, SearchData, SearchValue};

/// Caller-supplied compilation bypass for one field name.
///
/// When a field has a registered override, default compilation for that
/// field is skipped entirely, at every nesting depth. The override
/// returns a condition fragment and its positional arguments; an empty
/// fragment contributes nothing.
pub trait FieldOverride: Send + Sync {
    /// Compiles the predicate list for one field.
    fn compile(&self, values: &[SearchValue]) -> (String, Vec<Scalar>);
}

impl<F> FieldOverride for F
where
    F: Fn(&[SearchValue]) -> (String, Vec<Scalar>) + Send + Sync,
{
    fn compile(&self, values: &[SearchValue]) -> (String, Vec<Scalar>) {
        self(values)
    }
}

/// Field name → override, consulted before default compilation.
pub type OverrideMap = HashMap<String, Box<dyn FieldOverride>>;

/// The seam toward a query builder: one AND-combined condition at a time.
pub trait QueryBuilder {
    /// Adds a condition (with `?` placeholders) and its arguments.
    fn and_where(&mut self, condition: String, args: Vec<Scalar>);
}

/// A plain accumulator of AND-combined conditions.
///
/// Useful as a staging area when no ORM query object is at hand, and as
/// the reference implementation of [`QueryBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryConditions {
    clauses: Vec<(String, Vec<Scalar>)>,
}

impl QueryConditions {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no conditions were accumulated.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The accumulated (condition, arguments) pairs, in insertion order.
    pub fn clauses(&self) -> &[(String, Vec<Scalar>)] {
        &self.clauses
    }

    /// Joins the accumulated conditions into a WHERE clause and a flat
    /// argument sequence, or `None` if nothing was accumulated.
    pub fn into_where_string(self) -> Option<(String, Vec<Scalar>)> {
        if self.clauses.is_empty() {
            return None;
        }
        let mut fragments = Vec::with_capacity(self.clauses.len());
        let mut args = Vec::new();
        for (condition, mut clause_args) in self.clauses {
            fragments.push(condition);
            args.append(&mut clause_args);
        }
        Some((fragments.join(" AND "), args))
    }
}

impl QueryBuilder for QueryConditions {
    fn and_where(&mut self, condition: String, args: Vec<Scalar>) {
        self.clauses.push((condition, args));
    }
}

impl SearchData {
    /// Compiles the mapping into a query builder, one AND-combined
    /// condition per field.
    ///
    /// An empty mapping legitimately produces no conditions.
    ///
    /// # Example
    ///
    /// ```
    /// use qsearch_rs::search::{OverrideMap, QueryConditions, SearchParser};
    ///
    /// let parser = SearchParser::new();
    /// let data = parser.parse("age:18..30").unwrap();
    ///
    /// let mut query = QueryConditions::new();
    /// data.apply_to(&mut query, &OverrideMap::new());
    /// assert_eq!(query.clauses()[0].0, "age BETWEEN ? AND ?");
    /// ```
    pub fn apply_to<Q: QueryBuilder>(&self, query: &mut Q, overrides: &OverrideMap) {
        for (name, values) in self.iter() {
            compile_field(name, name, values, overrides, &mut |condition, args| {
                query.and_where(condition, args);
            });
        }
    }

    /// Compiles the mapping into a standalone WHERE clause with `?`
    /// placeholders and a matching positional argument sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoConditions`] if zero predicates compiled;
    /// an always-true clause is never fabricated.
    ///
    /// # Example
    ///
    /// ```
    /// use qsearch_rs::search::{OverrideMap, Scalar, SearchParser};
    ///
    /// let parser = SearchParser::new();
    /// let data = parser.parse("status:!=active,!=pending").unwrap();
    ///
    /// let (clause, args) = data.where_string(&OverrideMap::new()).unwrap();
    /// assert_eq!(clause, "(status != ? OR status != ?)");
    /// assert_eq!(args, vec![Scalar::Str("active".into()), Scalar::Str("pending".into())]);
    /// ```
    pub fn where_string(&self, overrides: &OverrideMap) -> SearchResult<(String, Vec<Scalar>)> {
        let mut fragments: Vec<String> = Vec::new();
        let mut args: Vec<Scalar> = Vec::new();
        for (name, values) in self.iter() {
            compile_field(name, name, values, overrides, &mut |condition, mut clause_args| {
                fragments.push(condition);
                args.append(&mut clause_args);
            });
        }
        if fragments.is_empty() {
            return Err(SearchError::NoConditions);
        }
        Ok((fragments.join(" AND "), args))
    }
}

/// Compiles one field's predicate list, emitting zero or more
/// AND-combined (condition, args) pairs into `sink`.
///
/// `lookup` is the original field name used for override dispatch;
/// `column` is the SQL column expression, which differs from `lookup`
/// inside nested groups where keys are rewritten to JSON accessors.
fn compile_field(
    lookup: &str,
    column: &str,
    values: &[SearchValue],
    overrides: &OverrideMap,
    sink: &mut dyn FnMut(String, Vec<Scalar>),
) {
    if let Some(handler) = overrides.get(lookup) {
        let (condition, args) = handler.compile(values);
        if !condition.is_empty() {
            sink(condition, args);
        }
        return;
    }

    let mut conditions: Vec<String> = Vec::new();
    let mut args: Vec<Scalar> = Vec::new();

    for value in values {
        match value {
            SearchValue::Compare {
                op: CompareOp::None,
                ..
            } => {}
            SearchValue::Compare {
                op: CompareOp::Range,
                value,
                value2,
            } => match (value, value2) {
                (Some(lo), Some(hi)) => {
                    conditions.push(format!("{column} BETWEEN ? AND ?"));
                    args.push(lo.clone());
                    args.push(hi.clone());
                }
                (Some(lo), None) => {
                    conditions.push(format!("{column} >= ?"));
                    args.push(lo.clone());
                }
                (None, Some(hi)) => {
                    conditions.push(format!("{column} <= ?"));
                    args.push(hi.clone());
                }
                (None, None) => {}
            },
            SearchValue::Compare { op, value, .. } => {
                if let (Some(sql), Some(operand)) = (op.sql(), value) {
                    conditions.push(format!("{column} {sql} ?"));
                    args.push(operand.clone());
                }
            }
            SearchValue::Nested(sub) => {
                // The sub-document is accessed as text-typed JSON: rewrite
                // every inner key to a JSON accessor and stringify every
                // scalar before recursing. Override dispatch keeps using
                // the original inner name.
                for (sub_name, sub_values) in sub.iter() {
                    if sub_values.is_empty() {
                        continue;
                    }
                    let sub_column = format!("{column}->>'{sub_name}'");
                    let text_values: Vec<SearchValue> =
                        sub_values.iter().map(stringify_value).collect();
                    compile_field(sub_name, &sub_column, &text_values, overrides, sink);
                }
            }
        }
    }

    if let Some(fragment) = join_or(conditions) {
        sink(fragment, args);
    }
}

/// OR-joins a field's conditions; multi-value groups are parenthesized.
fn join_or(mut conditions: Vec<String>) -> Option<String> {
    match conditions.len() {
        0 => None,
        1 => Some(conditions.remove(0)),
        _ => Some(format!("({})", conditions.join(" OR "))),
    }
}

/// Converts a predicate's scalars to their canonical text rendering.
fn stringify_value(value: &SearchValue) -> SearchValue {
    match value {
        SearchValue::Compare { op, value, value2 } => SearchValue::Compare {
            op: *op,
            value: value.as_ref().map(|s| Scalar::Str(s.to_string())),
            value2: value2.as_ref().map(|s| Scalar::Str(s.to_string())),
        },
        SearchValue::Nested(sub) => SearchValue::Nested(sub.clone()),
    }
}
