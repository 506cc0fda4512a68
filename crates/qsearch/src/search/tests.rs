//! Unit tests for the search parser.

use super::*;

fn parser() -> SearchParser {
    SearchParser::new()
}

fn single(data: &SearchData, name: &str) -> SearchValue {
    let values = data.get(name).unwrap_or_else(|| panic!("missing field {name}"));
    assert_eq!(values.len(), 1, "expected one value for {name}");
    values[0].clone()
}

#[test]
fn test_parse_empty_input() {
    let data = parser().parse("").unwrap();
    assert!(data.is_empty());

    let data = parser().parse("   ").unwrap();
    assert!(data.is_empty());
}

#[test]
fn test_parse_bare_field() {
    let data = parser().parse("name").unwrap();
    assert_eq!(data.get("name").unwrap(), &[]);
}

#[test]
fn test_parse_bare_field_dollar_and_cjk() {
    let data = parser().parse("$meta 标签").unwrap();
    assert!(data.get("$meta").is_some());
    assert!(data.get("标签").is_some());
}

#[test]
fn test_parse_integer_equality() {
    let data = parser().parse("age:30").unwrap();
    assert_eq!(single(&data, "age"), SearchValue::eq(Scalar::Int(30)));
}

#[test]
fn test_parse_comparison_operators() {
    let data = parser().parse("a:>1 b:>=2 c:<3 d:<=4 e:!=5").unwrap();
    assert_eq!(single(&data, "a"), SearchValue::compare(CompareOp::Gt, Scalar::Int(1)));
    assert_eq!(single(&data, "b"), SearchValue::compare(CompareOp::Gte, Scalar::Int(2)));
    assert_eq!(single(&data, "c"), SearchValue::compare(CompareOp::Lt, Scalar::Int(3)));
    assert_eq!(single(&data, "d"), SearchValue::compare(CompareOp::Lte, Scalar::Int(4)));
    assert_eq!(single(&data, "e"), SearchValue::compare(CompareOp::NotEq, Scalar::Int(5)));
}

#[test]
fn test_parse_closed_integer_range() {
    let data = parser().parse("age:18..30").unwrap();
    assert_eq!(
        single(&data, "age"),
        SearchValue::range(Some(Scalar::Int(18)), Some(Scalar::Int(30)))
    );
}

#[test]
fn test_parse_open_integer_ranges() {
    let data = parser().parse("age:..30").unwrap();
    assert_eq!(
        single(&data, "age"),
        SearchValue::range(None, Some(Scalar::Int(30)))
    );

    let data = parser().parse("age:18..").unwrap();
    assert_eq!(
        single(&data, "age"),
        SearchValue::range(Some(Scalar::Int(18)), None)
    );
}

#[test]
fn test_parse_wildcard_integer_ranges() {
    let data = parser().parse("age:*..30").unwrap();
    assert_eq!(
        single(&data, "age"),
        SearchValue::range(None, Some(Scalar::Int(30)))
    );

    let data = parser().parse("age:18..*").unwrap();
    assert_eq!(
        single(&data, "age"),
        SearchValue::range(Some(Scalar::Int(18)), None)
    );
}

#[test]
fn test_all_integer_range_classifies_as_integer() {
    // Integer literals also match the float grammar; the integer pattern
    // is consulted first and must win.
    let data = parser().parse("age:18..30").unwrap();
    match single(&data, "age") {
        SearchValue::Compare { value, value2, .. } => {
            assert_eq!(value, Some(Scalar::Int(18)));
            assert_eq!(value2, Some(Scalar::Int(30)));
        }
        other => panic!("expected range, got {other:?}"),
    }
}

#[test]
fn test_mixed_range_classifies_as_float() {
    let data = parser().parse("score:1..2.5").unwrap();
    assert_eq!(
        single(&data, "score"),
        SearchValue::range(Some(Scalar::Float(1.0)), Some(Scalar::Float(2.5)))
    );
}

#[test]
fn test_parse_float_values() {
    let data = parser().parse("score:0.5").unwrap();
    assert_eq!(single(&data, "score"), SearchValue::eq(Scalar::Float(0.5)));

    let data = parser().parse("score:>=1.25").unwrap();
    assert_eq!(
        single(&data, "score"),
        SearchValue::compare(CompareOp::Gte, Scalar::Float(1.25))
    );
}

#[test]
fn test_parse_timestamp_value() {
    let data = parser().parse("created:2023-01-02T03:04:05Z").unwrap();
    let expected = chrono::DateTime::parse_from_rfc3339("2023-01-02T03:04:05Z").unwrap();
    assert_eq!(single(&data, "created"), SearchValue::eq(Scalar::Time(expected)));
}

#[test]
fn test_parse_timestamp_range() {
    let data = parser()
        .parse("created:2023-01-01T00:00:00Z..2024-01-01T00:00:00+08:00")
        .unwrap();
    let lo = chrono::DateTime::parse_from_rfc3339("2023-01-01T00:00:00Z").unwrap();
    let hi = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00+08:00").unwrap();
    assert_eq!(
        single(&data, "created"),
        SearchValue::range(Some(Scalar::Time(lo)), Some(Scalar::Time(hi)))
    );
}

#[test]
fn test_date_only_shape_fails_timestamp_parse() {
    // Matches the timestamp shape but is not a full RFC 3339 timestamp.
    let err = parser().parse("created:2023-01-02").unwrap_err();
    assert!(matches!(err, SearchError::InvalidTime { token, .. } if token == "2023-01-02"));
}

#[test]
fn test_operator_with_range_is_rejected() {
    let err = parser().parse("age:>=18..30").unwrap_err();
    assert_eq!(err, SearchError::operator_with_range(">=18..30"));
}

#[test]
fn test_integer_overflow_is_reported() {
    let err = parser().parse("age:99999999999999999999").unwrap_err();
    assert!(matches!(err, SearchError::InvalidInt { token, .. } if token == "99999999999999999999"));
}

#[test]
fn test_parse_quoted_value_with_spaces() {
    let data = parser().parse("name:'John Doe'").unwrap();
    assert_eq!(
        single(&data, "name"),
        SearchValue::eq(Scalar::Str("John Doe".into()))
    );
}

#[test]
fn test_parse_quoted_value_without_spaces() {
    let data = parser().parse("name:'john'").unwrap();
    assert_eq!(single(&data, "name"), SearchValue::eq(Scalar::Str("john".into())));
}

#[test]
fn test_parse_not_equal_value_list() {
    let data = parser().parse("status:!=active,!=pending").unwrap();
    assert_eq!(
        data.get("status").unwrap(),
        &[
            SearchValue::compare(CompareOp::NotEq, Scalar::Str("active".into())),
            SearchValue::compare(CompareOp::NotEq, Scalar::Str("pending".into())),
        ]
    );
}

#[test]
fn test_parse_raw_string_fallback() {
    let data = parser().parse("tag:a-b_c").unwrap();
    assert_eq!(single(&data, "tag"), SearchValue::eq(Scalar::Str("a-b_c".into())));
}

#[test]
fn test_parse_empty_value_is_empty_string_equality() {
    let data = parser().parse("name:").unwrap();
    assert_eq!(single(&data, "name"), SearchValue::eq(Scalar::Str("".into())));
}

#[test]
fn test_invalid_token_reports_exact_token() {
    let err = parser().parse("bad::value").unwrap_err();
    assert_eq!(err, SearchError::invalid_syntax("bad::value"));

    let err = parser().parse("age:30 ???").unwrap_err();
    assert_eq!(err, SearchError::invalid_syntax("???"));
}

#[test]
fn test_parse_folds_dotted_fields() {
    let data = parser().parse("tags.color:red tags.size:xl age:30").unwrap();
    assert_eq!(data.len(), 2);

    match single(&data, "tags") {
        SearchValue::Nested(sub) => {
            assert_eq!(
                sub.get("color").unwrap(),
                &[SearchValue::eq(Scalar::Str("red".into()))]
            );
            assert_eq!(
                sub.get("size").unwrap(),
                &[SearchValue::eq(Scalar::Str("xl".into()))]
            );
        }
        other => panic!("expected nested group, got {other:?}"),
    }
}

#[test]
fn test_parse_flat_keeps_dotted_fields() {
    let data = parser().parse_flat("tags.color:red").unwrap();
    assert!(data.get("tags.color").is_some());
    assert!(data.get("tags").is_none());
}

#[test]
fn test_parse_leaves_deep_dotted_fields_flat() {
    let data = parser().parse("a.b.c:1").unwrap();
    assert!(data.get("a.b.c").is_some());
    assert!(data.get("a").is_none());
}

#[test]
fn test_parse_scoped_appends_schema_predicate() {
    let data = parser().parse_scoped("age:30", "tenant1").unwrap();
    assert_eq!(
        single(&data, "schema"),
        SearchValue::eq(Scalar::Str("tenant1".into()))
    );
    assert!(data.get("age").is_some());
}

#[test]
fn test_duplicate_field_last_token_wins() {
    let data = parser().parse("age:1 age:2").unwrap();
    assert_eq!(single(&data, "age"), SearchValue::eq(Scalar::Int(2)));
}

#[test]
fn test_unmatched_quote_truncates_parse() {
    let data = parser().parse("age:30 name:'John").unwrap();
    assert!(data.get("age").is_some());
    assert!(data.get("name").is_none());
}

#[test]
fn test_render_reparse_round_trip() {
    let inputs = [
        "age:30",
        "age:18..30",
        "score:>=0.5",
        "name:'John Doe'",
        "status:!=active,!=pending",
        "created:2023-01-02T03:04:05Z",
        "flags:>1,<10",
    ];
    let p = parser();
    for input in inputs {
        let parsed = p.parse(input).unwrap();
        let rendered = parsed.to_string();
        let reparsed = p.parse(&rendered).unwrap();
        assert_eq!(parsed, reparsed, "round-trip failed for {input} via {rendered}");
    }
}
