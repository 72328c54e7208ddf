//! Quick filter values and their string encodings.
//!
//! Table toolbars hand over quick filters as plain strings or string arrays.
//! Two encodings ride inside those strings:
//!
//! - date ranges as `"{from}|{to}"` (either side may be empty)
//! - an explicit operator as `"{operator}:{value}"` (e.g. `"gte:10"`)
//!
//! [`QuickFilterValue`] keeps those shapes apart as variants. The encodings
//! only exist at the boundary: [`encode_date_range`] / [`decode_date_range`]
//! and [`encode_prefixed`] / [`decode_prefixed`], plus the serde impls,
//! which read and write the raw `string | string[]` form.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::op::Operator;

/// Separator between the two sides of an encoded date range.
pub const RANGE_SEPARATOR: char = '|';

/// Separator between an operator prefix and its value.
pub const PREFIX_SEPARATOR: char = ':';

/// Encodes a date range as `"{from}|{to}"`.
pub fn encode_date_range(from: &str, to: &str) -> String {
    format!("{}{}{}", from, RANGE_SEPARATOR, to)
}

/// Decodes `"{from}|{to}"`.
///
/// Splits on the first separator. A string without a separator is a range
/// with only a lower bound.
pub fn decode_date_range(raw: &str) -> (&str, &str) {
    raw.split_once(RANGE_SEPARATOR).unwrap_or((raw, ""))
}

/// Encodes an operator-prefixed value as `"{operator}:{value}"`.
pub fn encode_prefixed(operator: Operator, value: &str) -> String {
    format!("{}{}{}", operator.as_str(), PREFIX_SEPARATOR, value)
}

/// Decodes `"{operator}:{value}"`.
///
/// Returns `None` unless the text before the first `:` is a known operator
/// name, so ordinary values that happen to contain a colon (`"10:30"`,
/// `"urn:x"`) are left alone.
pub fn decode_prefixed(raw: &str) -> Option<(Operator, &str)> {
    let (prefix, value) = raw.split_once(PREFIX_SEPARATOR)?;
    let operator = prefix.parse::<Operator>().ok()?;
    Some((operator, value))
}

/// A single quick filter value as entered in a table toolbar.
///
/// # Example
///
/// ```
/// use tablekit_filters::QuickFilterValue;
///
/// let range = QuickFilterValue::date_range("2024-01-01", "");
/// assert_eq!(range.encode(), vec!["2024-01-01|".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawQuickFilter", into = "RawQuickFilter")]
pub enum QuickFilterValue {
    /// A single raw string; interpreted according to the column's type.
    Text(String),
    /// Several selected values.
    Multi(Vec<String>),
    /// An explicit date range.
    DateRange { from: String, to: String },
    /// A value with an explicit operator.
    Prefixed { operator: Operator, value: String },
}

impl QuickFilterValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        QuickFilterValue::Text(value.into())
    }

    /// Creates a multi-select value.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QuickFilterValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Creates a date range value.
    pub fn date_range(from: impl Into<String>, to: impl Into<String>) -> Self {
        QuickFilterValue::DateRange {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Creates an operator-prefixed value.
    pub fn prefixed(operator: Operator, value: impl Into<String>) -> Self {
        QuickFilterValue::Prefixed {
            operator,
            value: value.into(),
        }
    }

    /// Returns `true` if this value means "no filter".
    ///
    /// Judged on the wire form: a value is empty when every encoded string
    /// is blank. Blank text and an empty list (or one holding only blanks)
    /// are empty; a range encodes to at least `"|"` and an operator to
    /// `"op:"`, so neither is.
    pub fn is_empty(&self) -> bool {
        match self {
            QuickFilterValue::Text(s) => s.trim().is_empty(),
            QuickFilterValue::Multi(items) => items.iter().all(|s| s.trim().is_empty()),
            QuickFilterValue::DateRange { .. } | QuickFilterValue::Prefixed { .. } => false,
        }
    }

    /// Encodes this value into its raw wire strings.
    ///
    /// Single values produce one string, `Multi` produces one per item.
    pub fn encode(&self) -> Vec<String> {
        match RawQuickFilter::from(self.clone()) {
            RawQuickFilter::One(s) => vec![s],
            RawQuickFilter::Many(items) => items,
        }
    }
}

impl From<&str> for QuickFilterValue {
    fn from(s: &str) -> Self {
        QuickFilterValue::Text(s.to_string())
    }
}

impl From<String> for QuickFilterValue {
    fn from(s: String) -> Self {
        QuickFilterValue::Text(s)
    }
}

impl From<Vec<String>> for QuickFilterValue {
    fn from(items: Vec<String>) -> Self {
        QuickFilterValue::Multi(items)
    }
}

impl From<Vec<&str>> for QuickFilterValue {
    fn from(items: Vec<&str>) -> Self {
        QuickFilterValue::multi(items)
    }
}

impl FromStr for QuickFilterValue {
    type Err = FilterError;

    /// Strictly decodes one wire string into a typed value.
    ///
    /// `"op:value"` becomes [`QuickFilterValue::Prefixed`] and `"from|to"`
    /// becomes [`QuickFilterValue::DateRange`]; anything else is text. Unlike
    /// normalization, which treats unrecognized prefixes as part of the
    /// value, a prefix made only of letters must name a known operator.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownOperator`] for an unknown letter-only
    /// prefix and [`FilterError::MalformedDateRange`] for a range with more
    /// than one separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((prefix, value)) = s.split_once(PREFIX_SEPARATOR) {
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
                let operator = prefix.parse::<Operator>()?;
                return Ok(QuickFilterValue::prefixed(operator, value));
            }
        }
        if s.contains(RANGE_SEPARATOR) {
            let (from, to) = decode_date_range(s);
            if to.contains(RANGE_SEPARATOR) {
                return Err(FilterError::MalformedDateRange(s.to_string()));
            }
            return Ok(QuickFilterValue::date_range(from, to));
        }
        Ok(QuickFilterValue::text(s))
    }
}

/// Raw wire form: a string or a string array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawQuickFilter {
    One(String),
    Many(Vec<String>),
}

impl From<RawQuickFilter> for QuickFilterValue {
    fn from(raw: RawQuickFilter) -> Self {
        match raw {
            RawQuickFilter::One(s) => QuickFilterValue::Text(s),
            RawQuickFilter::Many(items) => QuickFilterValue::Multi(items),
        }
    }
}

impl From<QuickFilterValue> for RawQuickFilter {
    fn from(value: QuickFilterValue) -> Self {
        match value {
            QuickFilterValue::Text(s) => RawQuickFilter::One(s),
            QuickFilterValue::Multi(items) => RawQuickFilter::Many(items),
            QuickFilterValue::DateRange { from, to } => {
                RawQuickFilter::One(encode_date_range(&from, &to))
            }
            QuickFilterValue::Prefixed { operator, value } => {
                RawQuickFilter::One(encode_prefixed(operator, &value))
            }
        }
    }
}

/// Quick filter values of one table, keyed by column.
///
/// Serializes as a JSON object of `column -> string | string[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuickFilterValues(BTreeMap<String, QuickFilterValue>);

impl QuickFilterValues {
    /// Creates an empty set of values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<QuickFilterValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets the value of a column, returning the previous one.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl Into<QuickFilterValue>,
    ) -> Option<QuickFilterValue> {
        self.0.insert(column.into(), value.into())
    }

    /// Removes a column's value.
    pub fn remove(&mut self, column: &str) -> Option<QuickFilterValue> {
        self.0.remove(column)
    }

    /// Returns a column's value.
    pub fn get(&self, column: &str) -> Option<&QuickFilterValue> {
        self.0.get(column)
    }

    /// Iterates over `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuickFilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of columns with a value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no column has a value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every value is empty.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(QuickFilterValue::is_empty)
    }
}

impl<K, V> FromIterator<(K, V)> for QuickFilterValues
where
    K: Into<String>,
    V: Into<QuickFilterValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        QuickFilterValues(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
