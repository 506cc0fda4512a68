//! Parser for the search mini-language.

use chrono::DateTime;

use super::error::{SearchError, SearchResult};
use super::grammar::Grammar;
use super::tokenizer::split_search_string;
use super::value::{CompareOp, Scalar, SearchData, SearchValue};

/// Parser for search query strings.
///
/// # Grammar
///
/// ```text
/// query      ::= token (" " token)*
/// token      ::= field ":" value ("," value)*     field filter
///              | field                            bare field (no filter)
///              | field ":" "'" any "'"            quoted literal
/// value      ::= op? body
/// op         ::= ">=" | "<=" | "!=" | ">" | "<"
/// body       ::= "'" string "'"                   string (op defaults to =)
///              | int | int? ".." int?             integer or range
///              | float | float? ".." float?       float or range
///              | rfc3339 | rfc3339? ".." rfc3339? timestamp or range
///              | string                           raw fallback (op defaults to =)
/// ```
///
/// A range endpoint written as `*` or left empty is unbounded on that
/// side. Values under one field are OR-combined, distinct fields are
/// AND-combined, and `outer.inner` fields fold into a nested predicate
/// group on the `outer` column.
///
/// # Example
///
/// ```
/// use qsearch_rs::search::{CompareOp, Scalar, SearchParser, SearchValue};
///
/// let parser = SearchParser::new();
/// let data = parser.parse("age:18..30 status:!=archived").unwrap();
///
/// assert_eq!(
///     data.get("age").unwrap(),
///     &[SearchValue::range(Some(Scalar::Int(18)), Some(Scalar::Int(30)))]
/// );
/// assert_eq!(
///     data.get("status").unwrap(),
///     &[SearchValue::compare(CompareOp::NotEq, Scalar::Str("archived".into()))]
/// );
/// ```
#[derive(Debug)]
pub struct SearchParser {
    grammar: Grammar,
}

/// A token rule: returns `None` when the token does not have this rule's
/// shape, `Some(Err(..))` when it does but its contents are invalid.
type TokenRule = fn(&SearchParser, &str) -> Option<SearchResult<(String, Vec<SearchValue>)>>;

/// A typed value matcher, consulted in a fixed order after the operator
/// prefix has been split off.
type ValueMatcher = fn(&SearchParser, CompareOp, &str, &str) -> Option<SearchResult<SearchValue>>;

/// Token rules in priority order; the first whose shape matches wins.
const TOKEN_RULES: &[TokenRule] = &[
    SearchParser::rule_field_values,
    SearchParser::rule_bare_field,
    SearchParser::rule_quoted_field,
];

/// Value matchers in priority order. The integer pattern precedes the
/// float pattern deliberately: integer literals are a subset of the float
/// grammar, and an all-integer range must classify as integer.
const VALUE_MATCHERS: &[ValueMatcher] = &[
    SearchParser::match_quoted,
    SearchParser::match_int,
    SearchParser::match_float,
    SearchParser::match_time,
];

impl SearchParser {
    /// Creates a parser, compiling the grammar patterns once.
    ///
    /// The parser is `Send + Sync`; a single instance can serve every
    /// request-handling task.
    pub fn new() -> Self {
        Self {
            grammar: Grammar::new(),
        }
    }

    /// Parses a search string into a predicate mapping, folding dotted
    /// field names into nested predicate groups.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidSyntax`] (or a wrapped numeric /
    /// timestamp parse error) if any token does not conform to the
    /// grammar; the offending token is attached.
    pub fn parse(&self, input: &str) -> SearchResult<SearchData> {
        Ok(self.parse_flat(input)?.fold_nested())
    }

    /// Parses a search string without folding dotted field names; keys
    /// like `tags.color` stay flat.
    pub fn parse_flat(&self, input: &str) -> SearchResult<SearchData> {
        let mut data = SearchData::new();
        for token in split_search_string(input) {
            self.match_token(&token, &mut data)?;
        }
        Ok(data)
    }

    /// Parses a search string with an implicit `schema:<value>` predicate
    /// appended, scoping the query to one tenant schema.
    pub fn parse_scoped(&self, input: &str, schema: &str) -> SearchResult<SearchData> {
        self.parse(&format!("{input} schema:'{schema}'"))
    }

    fn match_token(&self, token: &str, data: &mut SearchData) -> SearchResult<()> {
        for rule in TOKEN_RULES {
            if let Some(result) = rule(self, token) {
                let (name, values) = result?;
                data.insert(name, values);
                return Ok(());
            }
        }
        Err(SearchError::invalid_syntax(token))
    }

    /// `field:v1,v2,...` — each value independently typed.
    fn rule_field_values(&self, token: &str) -> Option<SearchResult<(String, Vec<SearchValue>)>> {
        let caps = self.grammar.field_values.captures(token)?;
        let name = caps[1].to_string();
        let list = &caps[2];

        let mut values = Vec::new();
        for raw in list.split(',') {
            match self.parse_value(raw) {
                Ok(value) => values.push(value),
                Err(err) => return Some(Err(err)),
            }
        }
        Some(Ok((name, values)))
    }

    /// A bare field: selected but not filtered.
    fn rule_bare_field(&self, token: &str) -> Option<SearchResult<(String, Vec<SearchValue>)>> {
        if self.grammar.bare_field.is_match(token) {
            Some(Ok((token.to_string(), Vec::new())))
        } else {
            None
        }
    }

    /// `field:'....'` — a quoted literal the value-list rule could not
    /// accept (embedded spaces and other delimiters).
    fn rule_quoted_field(&self, token: &str) -> Option<SearchResult<(String, Vec<SearchValue>)>> {
        let caps = self.grammar.quoted_field.captures(token)?;
        let value = SearchValue::eq(Scalar::Str(caps[2].to_string()));
        Some(Ok((caps[1].to_string(), vec![value])))
    }

    /// Parses one value from a comma-separated list.
    fn parse_value(&self, raw: &str) -> SearchResult<SearchValue> {
        let caps = self
            .grammar
            .value
            .captures(raw)
            .ok_or_else(|| SearchError::invalid_syntax(raw))?;

        let op = match caps.get(1).map(|m| m.as_str()) {
            None => CompareOp::None,
            Some("!=") => CompareOp::NotEq,
            Some(">") => CompareOp::Gt,
            Some(">=") => CompareOp::Gte,
            Some("<") => CompareOp::Lt,
            Some("<=") => CompareOp::Lte,
            Some(_) => return Err(SearchError::invalid_syntax(raw)),
        };
        let body = &caps[2];

        for matcher in VALUE_MATCHERS {
            if let Some(result) = matcher(self, op, body, raw) {
                return result;
            }
        }

        // Raw fallback: an unquoted, untyped string compares as equality.
        Ok(SearchValue::Compare {
            op: default_eq(op),
            value: Some(Scalar::Str(body.to_string())),
            value2: None,
        })
    }

    fn match_quoted(&self, op: CompareOp, body: &str, _raw: &str) -> Option<SearchResult<SearchValue>> {
        let caps = self.grammar.quoted_string.captures(body)?;
        Some(Ok(SearchValue::Compare {
            op: default_eq(op),
            value: Some(Scalar::Str(caps[1].to_string())),
            value2: None,
        }))
    }

    fn match_int(&self, op: CompareOp, body: &str, raw: &str) -> Option<SearchResult<SearchValue>> {
        let caps = self.grammar.int_range.captures(body)?;
        Some(typed_value(op, raw, &caps, |s| {
            s.parse::<i64>()
                .map(Scalar::Int)
                .map_err(|e| SearchError::invalid_int(raw, e))
        }))
    }

    fn match_float(&self, op: CompareOp, body: &str, raw: &str) -> Option<SearchResult<SearchValue>> {
        let caps = self.grammar.float_range.captures(body)?;
        Some(typed_value(op, raw, &caps, |s| {
            s.parse::<f64>()
                .map(Scalar::Float)
                .map_err(|e| SearchError::invalid_float(raw, e))
        }))
    }

    fn match_time(&self, op: CompareOp, body: &str, raw: &str) -> Option<SearchResult<SearchValue>> {
        let caps = self.grammar.time_range.captures(body)?;
        Some(typed_value(op, raw, &caps, |s| {
            DateTime::parse_from_rfc3339(s)
                .map(Scalar::Time)
                .map_err(|e| SearchError::invalid_time(raw, e))
        }))
    }
}

impl Default for SearchParser {
    fn default() -> Self {
        Self::new()
    }
}

/// An unset operator becomes equality once a concrete value is attached.
fn default_eq(op: CompareOp) -> CompareOp {
    if op == CompareOp::None {
        CompareOp::Eq
    } else {
        op
    }
}

/// Builds a typed predicate from range/single captures.
///
/// All typed patterns share the same capture layout: groups 1 and 2 are
/// the range endpoints, group 3 the single value.
fn typed_value(
    op: CompareOp,
    raw: &str,
    caps: &regex::Captures<'_>,
    parse: impl Fn(&str) -> SearchResult<Scalar>,
) -> SearchResult<SearchValue> {
    let bound = |m: Option<regex::Match<'_>>| -> SearchResult<Option<Scalar>> {
        match m.map(|m| m.as_str()) {
            None | Some("*") | Some("") => Ok(None),
            Some(s) => parse(s).map(Some),
        }
    };

    match caps.get(3) {
        Some(single) => Ok(SearchValue::Compare {
            op: default_eq(op),
            value: Some(parse(single.as_str())?),
            value2: None,
        }),
        None => {
            if op != CompareOp::None {
                return Err(SearchError::operator_with_range(raw));
            }
            Ok(SearchValue::range(
                bound(caps.get(1))?,
                bound(caps.get(2))?,
            ))
        }
    }
}
