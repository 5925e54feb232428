//! ORDER BY specifiers from request parameters.
//!
//! A specifier is one column or a comma-separated list whose entries may carry
//! their own direction (`"name asc, created_at desc"`). Direction words are
//! normalised strictly: exactly `asc` is ascending, anything else descending.

use once_cell::sync::Lazy;
use regex::Regex;
use sea_query::Order;
use serde::Serialize;
use std::fmt;

static ORDER_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([\w.]+)(?:\s+(asc|desc))?$").expect("valid order pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `"asc"` is ascending; every other word is descending.
    pub fn normalise(word: &str) -> Self {
        if word == "asc" {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDirective {
    pub column: String,
    pub direction: Direction,
}

impl OrderDirective {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, Direction::Desc)
    }
}

/// Parse an order specifier into directives, one per non-empty entry, in input order.
///
/// `fallback` applies to entries without an embedded direction; an absent fallback
/// means ascending. An embedded direction affects its own entry only. Columns may be
/// qualified (`posts.title`). Entries the pattern cannot read keep their trimmed text
/// as the column.
pub fn parse_order(spec: &str, fallback: Option<&str>) -> Vec<OrderDirective> {
    let fallback = fallback.unwrap_or("asc");
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match ORDER_ENTRY.captures(entry) {
            Some(captures) => {
                let column = captures.get(1).map_or(entry, |m| m.as_str());
                let word = captures.get(2).map_or(fallback, |m| m.as_str());
                OrderDirective::new(column, Direction::normalise(word))
            }
            None => OrderDirective::new(entry, Direction::normalise(fallback)),
        })
        .collect()
}
