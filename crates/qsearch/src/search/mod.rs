//! Search mini-language parser and predicate compiler.
//!
//! A compact query-string language for HTTP API clients to express
//! filters, sort order, and nested-field predicates without exposing raw
//! SQL.
//!
//! # Supported Syntax
//!
//! ## Field filters
//! - `age:30` - equality (integer)
//! - `score:>=0.5` - comparison operators `>`, `>=`, `<`, `<=`, `!=`
//! - `age:18..30` - inclusive range; `18..`, `..30`, `*..30` leave one
//!   side unbounded
//! - `status:active,pending` - comma-separated values OR-combine
//! - `name:'John Doe'` - single-quoted values may contain spaces
//! - `created:2023-01-02T00:00:00Z` - RFC 3339 timestamps
//!
//! ## Nested fields
//! - `tags.color:red` - predicates on a JSON sub-document; compiles to a
//!   `tags->>'color'` accessor (one level deep only)
//!
//! ## Bare fields
//! - `name` - selects a field without filtering on it
//!
//! ## Sort order
//! - `name-,age+` - comma-separated sort keys; trailing `-` descends,
//!   `+` or nothing ascends
//!
//! Distinct fields AND-combine; values under one field OR-combine.
//!
//! # Example
//!
//! ```
//! use qsearch_rs::search::{OverrideMap, SearchParser};
//!
//! let parser = SearchParser::new();
//! let data = parser.parse("age:18..30 tags.color:red").unwrap();
//!
//! let (clause, args) = data.where_string(&OverrideMap::new()).unwrap();
//! assert_eq!(clause, "age BETWEEN ? AND ? AND tags->>'color' = ?");
//! assert_eq!(args.len(), 3);
//! ```

mod compile;
mod error;
mod grammar;
mod order;
mod parser;
mod tokenizer;
mod value;

pub use compile::{FieldOverride, OverrideMap, QueryBuilder, QueryConditions};
pub use error::{SearchError, SearchResult};
pub use order::{order_by_clause, parse_order_by, Order};
pub use parser::SearchParser;
pub use tokenizer::split_search_string;
pub use value::{CompareOp, Scalar, SearchData, SearchValue};

#[cfg(test)]
mod tests;
