//! Values carried by server filter clauses.
//!
//! [`FilterValue`] is the normalized, already-typed value of a
//! [`ServerTableFilter`](crate::ServerTableFilter). On the wire it is untagged:
//! `null`, a boolean, a number, a string, a string array or a `{from, to}`
//! object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric filter value.
///
/// Integers stay integers so that `"5"` serializes as `5` rather than `5.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Integer value.
    Int(i64),
    /// Finite floating-point value.
    Float(f64),
}

impl Number {
    /// Parses a number from user input.
    ///
    /// Surrounding whitespace is ignored. Integers are tried first, then
    /// floats. Returns `None` for anything unparseable and for non-finite
    /// floats (`NaN`, `inf`), which no backend can filter on.
    pub fn parse(input: &str) -> Option<Number> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Number::Int(n));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Number::Float(f)),
            _ => None,
        }
    }

    /// Converts to `f64`, possibly losing precision for large integers.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(i64::from(n))
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

/// Date range bounds for `dateBetween` clauses.
///
/// An open side is `None` and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: Option<String>,
    /// Inclusive upper bound.
    pub to: Option<String>,
}

impl DateRange {
    /// Creates a range, treating blank bounds as open.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        DateRange {
            from: non_blank(from.into()),
            to: non_blank(to.into()),
        }
    }

    /// Returns `true` if both sides are open.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Normalized value of a server filter clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value (used by `isNull` / `isNotNull`).
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    Text(String),
    /// List of values (used by `in` / `notIn`).
    List(Vec<String>),
    /// Date range (used by `dateBetween`).
    Range(DateRange),
}

impl FilterValue {
    /// Returns the text value, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list, if this is `List`.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FilterValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the range, if this is `Range`.
    pub fn as_range(&self) -> Option<&DateRange> {
        match self {
            FilterValue::Range(range) => Some(range),
            _ => None,
        }
    }

    /// Returns `true` if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(items: Vec<String>) -> Self {
        FilterValue::List(items)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(items: Vec<&str>) -> Self {
        FilterValue::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(Number::Int(n))
    }
}

impl From<f64> for FilterValue {
    fn from(f: f64) -> Self {
        FilterValue::Number(Number::Float(f))
    }
}

impl From<DateRange> for FilterValue {
    fn from(range: DateRange) -> Self {
        FilterValue::Range(range)
    }
}
