//! Sort-order parsing for the `order_by` query parameter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One sort key with its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The column name to sort by.
    pub name: String,
    /// True for descending order.
    pub desc: bool,
}

impl Order {
    /// Creates an ascending sort key.
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: false,
        }
    }

    /// Creates a descending sort key.
    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: true,
        }
    }
}

impl fmt::Display for Order {
    /// Renders the ORDER BY term: `name` ascending, `name DESC` descending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.desc {
            write!(f, "{} DESC", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Parses a comma-separated sort-key list with trailing `+`/`-`
/// direction markers.
///
/// A trailing `-` sorts descending, a trailing `+` (or no marker) sorts
/// ascending; empty parts are skipped; input order is preserved as the
/// ORDER BY precedence.
///
/// # Example
///
/// ```
/// use qsearch_rs::search::{parse_order_by, Order};
///
/// let orders = parse_order_by("name-,age+");
/// assert_eq!(orders, vec![Order::desc("name"), Order::asc("age")]);
/// ```
pub fn parse_order_by(text: &str) -> Vec<Order> {
    let mut orders = Vec::new();
    for part in text.split(',') {
        let (name, desc) = match part.strip_suffix('-') {
            Some(name) => (name, true),
            None => (part.strip_suffix('+').unwrap_or(part), false),
        };
        if name.is_empty() {
            continue;
        }
        orders.push(Order {
            name: name.to_string(),
            desc,
        });
    }
    orders
}

/// Joins sort keys into an ORDER BY tail, e.g. `name DESC, age`.
pub fn order_by_clause(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|order| order.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_by_directions() {
        let orders = parse_order_by("name-,age+");
        assert_eq!(orders, vec![Order::desc("name"), Order::asc("age")]);
    }

    #[test]
    fn test_parse_order_by_default_is_ascending() {
        let orders = parse_order_by("created_at");
        assert_eq!(orders, vec![Order::asc("created_at")]);
    }

    #[test]
    fn test_parse_order_by_skips_empty_parts() {
        let orders = parse_order_by("name-,,age,");
        assert_eq!(orders, vec![Order::desc("name"), Order::asc("age")]);
    }

    #[test]
    fn test_parse_order_by_empty_input() {
        assert!(parse_order_by("").is_empty());
        assert!(parse_order_by("-").is_empty());
    }

    #[test]
    fn test_parse_order_by_preserves_precedence() {
        let orders = parse_order_by("b,a,c-");
        let names: Vec<&str> = orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_order_by_clause_rendering() {
        let orders = parse_order_by("name-,age");
        assert_eq!(order_by_clause(&orders), "name DESC, age");
        assert_eq!(order_by_clause(&[]), "");
    }
}
