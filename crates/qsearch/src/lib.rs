//! Query-string search mini-language parser and SQL predicate compiler.
//!
//! This crate parses a compact filter/sort syntax from HTTP query
//! parameters into a typed predicate mapping, then compiles it into
//! parameterized relational conditions - either by mutating a query
//! builder or as a standalone WHERE clause with positional arguments.

pub mod search;

pub use search::{
    parse_order_by, CompareOp, FieldOverride, Order, OverrideMap, QueryBuilder, QueryConditions,
    Scalar, SearchData, SearchError, SearchParser, SearchResult, SearchValue,
};
