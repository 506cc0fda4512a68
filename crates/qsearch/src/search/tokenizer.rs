//! Tokenizer for search strings.

/// Splits a raw search string into whitespace-delimited tokens, treating
/// single-quoted spans as atomic.
///
/// Quotes are kept in the emitted token; the grammar strips them later.
/// An opening quote with no matching close silently ends tokenization and
/// the tokens emitted so far are returned. Empty input yields an empty
/// vector.
///
/// # Example
///
/// ```
/// use qsearch_rs::search::split_search_string;
///
/// let parts = split_search_string("name:'John Doe' age:30");
/// assert_eq!(parts, vec!["name:'John Doe'", "age:30"]);
/// ```
pub fn split_search_string(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut parts = Vec::new();
    if text.is_empty() {
        return parts;
    }

    let mut push = |token: &str| {
        let token = token.trim();
        if !token.is_empty() {
            parts.push(token.to_string());
        }
    };

    let mut start = 0;
    loop {
        let space_idx = text[start..].find(' ');
        let quote_idx = text[start..].find('\'');

        match (space_idx, quote_idx) {
            (None, None) => {
                push(&text[start..]);
                break;
            }
            // Space before any quote: plain token boundary.
            (Some(space), None) => {
                push(&text[start..start + space]);
                start += space + 1;
            }
            (Some(space), Some(quote)) if space < quote => {
                push(&text[start..start + space]);
                start += space + 1;
            }
            // Quoted span: consume through the closing quote as one token.
            (_, Some(quote)) => {
                match text[start + quote + 1..].find('\'') {
                    Some(close) => {
                        let end = start + quote + close + 2;
                        push(&text[start..end]);
                        start = end;
                    }
                    // Unmatched quote: stop here, keeping what we have.
                    None => break,
                }
            }
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_empty() {
        assert!(split_search_string("").is_empty());
        assert!(split_search_string("   ").is_empty());
    }

    #[test]
    fn test_split_plain_tokens() {
        assert_eq!(
            split_search_string("age:30 status:active"),
            vec!["age:30", "status:active"]
        );
    }

    #[test]
    fn test_split_quoted_span_is_atomic() {
        assert_eq!(
            split_search_string("name:'John Doe' age:30"),
            vec!["name:'John Doe'", "age:30"]
        );
    }

    #[test]
    fn test_split_quoted_span_at_end() {
        assert_eq!(
            split_search_string("age:30 name:'John Doe'"),
            vec!["age:30", "name:'John Doe'"]
        );
    }

    #[test]
    fn test_split_unmatched_quote_truncates() {
        assert_eq!(split_search_string("age:30 name:'John"), vec!["age:30"]);
    }

    #[test]
    fn test_split_collapses_extra_whitespace() {
        assert_eq!(split_search_string("  a:1   b:2  "), vec!["a:1", "b:2"]);
    }
}
