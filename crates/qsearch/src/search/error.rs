//! Error types for search parsing and compilation.

use thiserror::Error;

/// A specialized Result type for search parsing and compilation.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while parsing a search string or compiling it
/// into SQL conditions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// A token did not match any rule of the search grammar.
    #[error("invalid search syntax: {token}")]
    InvalidSyntax {
        /// The offending token, verbatim.
        token: String,
    },

    /// A comparison operator was combined with a `..` range in one value.
    #[error("comparison operator cannot be combined with a range: {token}")]
    OperatorWithRange {
        /// The offending value, verbatim.
        token: String,
    },

    /// A value matched the integer shape but failed to parse as `i64`.
    #[error("invalid integer in {token}: {source}")]
    InvalidInt {
        /// The offending value, verbatim.
        token: String,
        /// The underlying parse error.
        source: std::num::ParseIntError,
    },

    /// A value matched the float shape but failed to parse as `f64`.
    #[error("invalid float in {token}: {source}")]
    InvalidFloat {
        /// The offending value, verbatim.
        token: String,
        /// The underlying parse error.
        source: std::num::ParseFloatError,
    },

    /// A value matched the timestamp shape but failed to parse as RFC 3339.
    #[error("invalid timestamp in {token}: {source}")]
    InvalidTime {
        /// The offending value, verbatim.
        token: String,
        /// The underlying parse error.
        source: chrono::ParseError,
    },

    /// The string backend compiled zero predicates.
    #[error("no valid search conditions")]
    NoConditions,
}

impl SearchError {
    /// Creates an invalid syntax error for the given token.
    pub fn invalid_syntax(token: impl Into<String>) -> Self {
        SearchError::InvalidSyntax {
            token: token.into(),
        }
    }

    /// Creates an operator-with-range conflict error for the given value.
    pub fn operator_with_range(token: impl Into<String>) -> Self {
        SearchError::OperatorWithRange {
            token: token.into(),
        }
    }

    /// Creates an integer parse error for the given value.
    pub fn invalid_int(token: impl Into<String>, source: std::num::ParseIntError) -> Self {
        SearchError::InvalidInt {
            token: token.into(),
            source,
        }
    }

    /// Creates a float parse error for the given value.
    pub fn invalid_float(token: impl Into<String>, source: std::num::ParseFloatError) -> Self {
        SearchError::InvalidFloat {
            token: token.into(),
            source,
        }
    }

    /// Creates a timestamp parse error for the given value.
    pub fn invalid_time(token: impl Into<String>, source: chrono::ParseError) -> Self {
        SearchError::InvalidTime {
            token: token.into(),
            source,
        }
    }
}
