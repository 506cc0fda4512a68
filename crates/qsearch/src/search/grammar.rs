//! Compiled grammar patterns for the search mini-language.
//!
//! All patterns are compiled once by [`Grammar::new`] and shared read-only
//! by the parser, so a single parser instance is safe for unbounded
//! concurrent use.

use regex::Regex;

/// A bare field token: letters, digits, `_`, `-`, `.`, CJK, optional
/// leading `$`, no colon.
const BARE_FIELD: &str = r"^(\$?[A-Za-z0-9_\-\p{Han}.]+)$";

/// A `field:value,value,...` token. Each value is an optional comparison
/// operator followed by an optionally quoted body. The first body
/// character may not be `:`, so a stray colon (`bad::value`) fails the
/// rule instead of parsing as a string value; quoting remains the escape
/// hatch for values with a leading colon.
const FIELD_VALUES: &str = r#"^(\$?[A-Za-z0-9_\-.]+):((?:(?:>=|<=|!=|>|<)?["']?(?:\$?(?:[A-Za-z0-9\p{Han}_.\-+*][A-Za-z0-9\p{Han}_.\-:+*]*)?)["']?)(?:,(?:(?:>=|<=|!=|>|<)?["']?(?:\$?(?:[A-Za-z0-9\p{Han}_.\-+*][A-Za-z0-9\p{Han}_.\-:+*]*)?)["']?))*)$"#;

/// One value from a comma-separated list: operator prefix plus body.
const VALUE: &str = r#"^(>=|<=|!=|>|<)?(\$?[A-Za-z0-9\p{Han}_.\-:+*"']*)$"#;

/// A `field:'....'` literal whose interior is arbitrary (spaces included).
const QUOTED_FIELD: &str = r#"^(\$?[A-Za-z0-9_\-.]+):["'](.*)["']$"#;

/// A quoted value body: `'....'` or `"...."`.
const QUOTED_STRING: &str = r#"^["'](.*)["']$"#;

/// An integer, or an integer range with `*` or empty meaning unbounded.
const INT_RANGE: &str = r"^(?:(\d+|\*)?\.\.(\d+|\*)?|(\d+))$";

/// A float, or a float range. The literal grammar is a superset of the
/// integer grammar, so the integer pattern must be consulted first.
const FLOAT_RANGE: &str = r"^(?:([1-9]\d*\.\d*|0\.\d*[1-9]\d*|\d+|\*)?\.\.([1-9]\d*\.\d*|0\.\d*[1-9]\d*|\d+|\*)?|([1-9]\d*\.\d*|0\.\d*[1-9]\d*|\d+))$";

/// An RFC 3339 shaped timestamp (offset optional at the shape level;
/// parsing enforces the full form), or a timestamp range.
const TIME_STAMP: &str = r"\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}:\d{2}(?:[+-]\d{2}:\d{2}|Z)?)?";

/// Compiled patterns for the search grammar.
///
/// Construction is explicit rather than ambient global state; the parser
/// holds one instance by value and lends it to every rule.
#[derive(Debug)]
pub(crate) struct Grammar {
    pub(crate) bare_field: Regex,
    pub(crate) field_values: Regex,
    pub(crate) value: Regex,
    pub(crate) quoted_field: Regex,
    pub(crate) quoted_string: Regex,
    pub(crate) int_range: Regex,
    pub(crate) float_range: Regex,
    pub(crate) time_range: Regex,
}

impl Grammar {
    /// Compiles all grammar patterns.
    pub(crate) fn new() -> Self {
        let time_range = format!(r"^(?:({TIME_STAMP}|\*)?\.\.({TIME_STAMP}|\*)?|({TIME_STAMP}))$");
        Self {
            bare_field: compile(BARE_FIELD),
            field_values: compile(FIELD_VALUES),
            value: compile(VALUE),
            quoted_field: compile(QUOTED_FIELD),
            quoted_string: compile(QUOTED_STRING),
            int_range: compile(INT_RANGE),
            float_range: compile(FLOAT_RANGE),
            time_range: compile(&time_range),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are fixed at compile time; failure is a programmer error.
    Regex::new(pattern).expect("grammar pattern must compile")
}
