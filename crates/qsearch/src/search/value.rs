//! Parsed predicate values and the field → predicate mapping.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Comparison operators recognized by the search grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Bare presence marker with no comparison; a no-op at compile time.
    None,
    /// Inclusive range (`lo..hi`), possibly open on one side.
    Range,
    /// `!=` not equal.
    NotEq,
    /// `=` equal (the default when no operator is written).
    Eq,
    /// `>` greater than.
    Gt,
    /// `>=` greater or equal.
    Gte,
    /// `<` less than.
    Lt,
    /// `<=` less or equal.
    Lte,
}

impl CompareOp {
    /// The operator prefix as written in the query grammar.
    ///
    /// `None` and `Eq` render as the empty string: equality is the
    /// default and needs no prefix.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::None | CompareOp::Eq => "",
            CompareOp::Range => "..",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// The SQL comparison for this operator, or `None` for the no-op
    /// and range cases which have no single-operand translation.
    pub fn sql(&self) -> Option<&'static str> {
        match self {
            CompareOp::None | CompareOp::Range => None,
            CompareOp::NotEq => Some("!="),
            CompareOp::Eq => Some("="),
            CompareOp::Gt => Some(">"),
            CompareOp::Gte => Some(">="),
            CompareOp::Lt => Some("<"),
            CompareOp::Lte => Some("<="),
        }
    }
}

/// A typed scalar operand inferred from the query grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A plain string value.
    Str(String),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A timestamp with offset, parsed from RFC 3339.
    Time(DateTime<FixedOffset>),
}

impl fmt::Display for Scalar {
    /// Canonical text rendering: this is what nested predicates are
    /// stringified to before being compared against JSON sub-document text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Time(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Scalar::Time(t)
    }
}

/// A single parsed predicate for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    /// A comparison against one or two scalar operands.
    ///
    /// `value2` is populated only for [`CompareOp::Range`]. In an open-ended
    /// range exactly one of `value`/`value2` is absent, meaning "unbounded on
    /// that side".
    Compare {
        /// The comparison operator.
        op: CompareOp,
        /// The first (or only) operand.
        value: Option<Scalar>,
        /// The upper range bound.
        value2: Option<Scalar>,
    },

    /// Predicates on a JSON sub-document addressed by the parent field.
    ///
    /// Produced by folding `outer.inner` keys; never combined with a scalar.
    Nested(SearchData),
}

impl SearchValue {
    /// Creates an equality predicate.
    ///
    /// # Example
    ///
    /// ```
    /// use qsearch_rs::search::{Scalar, SearchValue};
    ///
    /// let v = SearchValue::eq(Scalar::Str("active".into()));
    /// assert!(matches!(v, SearchValue::Compare { .. }));
    /// ```
    pub fn eq(value: impl Into<Scalar>) -> Self {
        SearchValue::compare(CompareOp::Eq, value)
    }

    /// Creates a single-operand comparison predicate.
    pub fn compare(op: CompareOp, value: impl Into<Scalar>) -> Self {
        SearchValue::Compare {
            op,
            value: Some(value.into()),
            value2: None,
        }
    }

    /// Creates a range predicate; either side may be `None` for an
    /// open-ended range.
    pub fn range(lo: Option<Scalar>, hi: Option<Scalar>) -> Self {
        SearchValue::Compare {
            op: CompareOp::Range,
            value: lo,
            value2: hi,
        }
    }
}

impl fmt::Display for SearchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchValue::Compare {
                op: CompareOp::Range,
                value,
                value2,
            } => {
                // Open sides render as the wildcard so the token re-parses.
                match value {
                    Some(v) => write!(f, "{v}")?,
                    None => write!(f, "*")?,
                }
                write!(f, "..")?;
                match value2 {
                    Some(v) => write!(f, "{v}"),
                    None => write!(f, "*"),
                }
            }
            SearchValue::Compare { op, value, .. } => {
                write!(f, "{}", op.symbol())?;
                match value {
                    Some(Scalar::Str(s)) => write!(f, "'{s}'"),
                    Some(v) => write!(f, "{v}"),
                    None => Ok(()),
                }
            }
            SearchValue::Nested(sub) => write!(f, "{sub}"),
        }
    }
}

/// The full set of field → predicate-list associations parsed from one
/// query string.
///
/// Values under the same key are OR-combined; distinct keys are
/// AND-combined. A bare field is stored with an empty predicate list and
/// has no filtering effect. Backed by a `BTreeMap` so compiled output is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchData {
    fields: BTreeMap<String, Vec<SearchValue>>,
}

impl SearchData {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) the predicate list for a field.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<SearchValue>) {
        self.fields.insert(name.into(), values);
    }

    /// Returns the predicate list for a field, if present.
    pub fn get(&self, name: &str) -> Option<&[SearchValue]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Returns true if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The number of fields in the mapping.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterates fields in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<SearchValue>)> {
        self.fields.iter()
    }

    /// Regroups `outer.inner` keys into nested predicate groups.
    ///
    /// All `inner → values` pairs sharing the same `outer` prefix are
    /// collected into a fresh mapping stored under `outer` as a single
    /// [`SearchValue::Nested`]. Keys with zero or more than one dot pass
    /// through unchanged; folding is one level deep only.
    pub fn fold_nested(self) -> SearchData {
        let mut folded = SearchData::new();
        let mut groups: BTreeMap<String, SearchData> = BTreeMap::new();

        for (name, values) in self.fields {
            match name.split_once('.') {
                Some((outer, inner))
                    if !outer.is_empty() && !inner.is_empty() && !inner.contains('.') =>
                {
                    groups
                        .entry(outer.to_string())
                        .or_default()
                        .insert(inner, values);
                }
                _ => {
                    folded.fields.insert(name, values);
                }
            }
        }
        for (outer, sub) in groups {
            folded.fields.insert(outer, vec![SearchValue::Nested(sub)]);
        }
        folded
    }
}

impl fmt::Display for SearchData {
    /// Renders the mapping back to query-string tokens.
    ///
    /// Nested groups render as `outer.inner:value` tokens; bare fields and
    /// empty predicate lists are omitted. For non-nested predicates the
    /// rendering re-parses to an equivalent mapping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for (name, values) in self.iter() {
            let mut rendered: Vec<String> = Vec::new();
            for value in values {
                match value {
                    SearchValue::Nested(sub) => {
                        for (sub_name, sub_values) in sub.iter() {
                            for sub_value in sub_values {
                                parts.push(format!("{name}.{sub_name}:{sub_value}"));
                            }
                        }
                    }
                    other => rendered.push(other.to_string()),
                }
            }
            if !rendered.is_empty() {
                parts.push(format!("{name}:{}", rendered.join(",")));
            }
        }
        write!(f, "{}", parts.join(" "))
    }
}
