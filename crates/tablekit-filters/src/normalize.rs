//! Quick filter normalization.
//!
//! Turns the quick filter values of one table into server filter clauses,
//! using the table's definitions in the [`FilterRegistry`] to decide each
//! column's operator and value type.
//!
//! | Filter type | Default operator | Value |
//! |-------------|------------------|-------|
//! | `string` | `contains` | text |
//! | `number` | `equals` | number (integer or finite float) |
//! | `boolean` | `equals` | bool (`true/false/1/0/yes/no`) |
//! | `date` | `equals` (`dateBetween` for `"from|to"`) | date text, or `{from, to}` |
//! | `daterange` | `dateBetween` | `{from, to}` decoded from `"from|to"` |
//! | `select` | `equals` (`in` for several values) | text |
//! | `multiselect` | `in` | list, blank entries removed |
//! | `autocomplete` | `equals` | selected id |
//!
//! Free-text columns always use `contains`; an explicit `"equals:..."`
//! prefix opts into exact matching. Blank entries of a list are removed
//! before any column sees it, and a list left with one entry counts as a
//! single value.
//!
//! Typed [`QuickFilterValue`]s are normalized through their wire encoding,
//! so a value and its serialized form always produce the same clauses.
//!
//! Normalization never fails. Values for columns the registry doesn't know,
//! values that don't coerce to the column's type, and shapes or operators
//! the column can't take are dropped. [`normalize_with_diagnostics`] reports what
//! was dropped and why; [`normalize`] just returns the clauses.
//!
//! Output follows the registry's definition order, not the order of the
//! input map, so the same values always produce the same clause list.

use std::fmt;

use tracing::debug;

use crate::clause::ServerTableFilter;
use crate::definition::{FilterDefinition, FilterType};
use crate::op::Operator;
use crate::quick::{
    decode_date_range, decode_prefixed, QuickFilterValue, QuickFilterValues, RANGE_SEPARATOR,
};
use crate::registry::FilterRegistry;
use crate::value::{DateRange, FilterValue, Number};

/// Why a quick filter value produced no clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The registry has no definition for the column.
    UnknownColumn,
    /// The value is not a number.
    InvalidNumber(String),
    /// The value is not a boolean.
    InvalidBoolean(String),
    /// The operator is not valid for the column's type.
    UnsupportedOperator(Operator),
    /// The value's shape (list, range) doesn't fit the column's type.
    UnsupportedShape,
    /// An operator prefix was given without a value.
    MissingValue,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnknownColumn => write!(f, "unknown column"),
            DropReason::InvalidNumber(v) => write!(f, "'{}' is not a number", v),
            DropReason::InvalidBoolean(v) => write!(f, "'{}' is not a boolean", v),
            DropReason::UnsupportedOperator(op) => write!(f, "operator '{}' not supported", op),
            DropReason::UnsupportedShape => write!(f, "value shape not supported"),
            DropReason::MissingValue => write!(f, "operator given without a value"),
        }
    }
}

/// A quick filter value that was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFilter {
    /// The column the value was given for.
    pub column: String,
    /// Why it was dropped.
    pub reason: DropReason,
}

/// Result of normalization with diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Normalized clauses, in registry order.
    pub filters: Vec<ServerTableFilter>,
    /// Values that produced no clause for a reason other than being empty.
    pub dropped: Vec<DroppedFilter>,
}

/// Normalizes quick filter values into server filter clauses.
///
/// # Example
///
/// ```
/// use tablekit_filters::{
///     normalize, FilterDefinition, FilterRegistry, FilterType, QuickFilterValues,
/// };
///
/// let registry = FilterRegistry::builder()
///     .filter("projects", FilterDefinition::new("status", "Status", FilterType::Select))
///     .build()
///     .unwrap();
///
/// let values = QuickFilterValues::new()
///     .with("status", "active")
///     .with("ghost", "boo");
///
/// let filters = normalize(&registry, "projects", &values);
/// assert_eq!(filters.len(), 1);
/// assert_eq!(filters[0].field, "status");
/// ```
pub fn normalize(
    registry: &FilterRegistry,
    table_id: &str,
    values: &QuickFilterValues,
) -> Vec<ServerTableFilter> {
    normalize_with_diagnostics(registry, table_id, values).filters
}

/// Normalizes quick filter values, also reporting dropped values.
pub fn normalize_with_diagnostics(
    registry: &FilterRegistry,
    table_id: &str,
    values: &QuickFilterValues,
) -> Normalized {
    let defs = registry.get_filters(table_id);
    let mut out = Normalized::default();

    for def in defs {
        let Some(value) = values.get(&def.column_key) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match normalize_value(def, value) {
            Ok(Some(filter)) => out.filters.push(filter),
            Ok(None) => {}
            Err(reason) => {
                debug!(
                    table_id,
                    column = %def.column_key,
                    filter_type = %def.filter_type,
                    %reason,
                    "Dropped quick filter"
                );
                out.dropped.push(DroppedFilter {
                    column: def.column_key.clone(),
                    reason,
                });
            }
        }
    }

    for (column, value) in values.iter() {
        if value.is_empty() || defs.iter().any(|d| d.column_key == column) {
            continue;
        }
        debug!(table_id, column, "Dropped quick filter for unknown column");
        out.dropped.push(DroppedFilter {
            column: column.to_string(),
            reason: DropReason::UnknownColumn,
        });
    }

    out
}

/// A quick filter value reduced to its non-blank wire strings.
///
/// Typed values are encoded first, so a value and its serialized form
/// always normalize the same way.
enum Shape<'a> {
    /// One raw string, possibly carrying an operator prefix or a range.
    Raw(&'a str),
    /// Two or more values.
    Many(Vec<&'a str>),
}

impl<'a> Shape<'a> {
    fn of(encoded: &'a [String]) -> Shape<'a> {
        let items: Vec<&str> = encoded
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect();
        if items.len() == 1 {
            Shape::Raw(items[0])
        } else {
            Shape::Many(items)
        }
    }
}

type Outcome = Result<Option<ServerTableFilter>, DropReason>;

fn normalize_value(def: &FilterDefinition, value: &QuickFilterValue) -> Outcome {
    let encoded = value.encode();
    let shape = Shape::of(&encoded);
    match def.filter_type {
        FilterType::String => scalar(def, shape, Operator::Contains, Operator::is_text_op, text),
        FilterType::Number => scalar(def, shape, Operator::Equals, Operator::is_number_op, number),
        FilterType::Boolean => scalar(def, shape, Operator::Equals, Operator::is_choice_op, boolean),
        FilterType::Date => date(def, shape),
        FilterType::Daterange => daterange(def, shape),
        FilterType::Select => match shape {
            Shape::Many(items) => Ok(Some(ServerTableFilter::one_of(&def.column_key, items))),
            other => scalar(def, other, Operator::Equals, Operator::is_choice_op, text),
        },
        FilterType::Multiselect => multiselect(def, shape),
        FilterType::Autocomplete => scalar(def, shape, Operator::Equals, Operator::is_choice_op, text),
    }
}

/// Normalizes a single-valued column.
///
/// A prefix the column doesn't support is treated as part of the value.
fn scalar(
    def: &FilterDefinition,
    shape: Shape<'_>,
    default_op: Operator,
    allowed: fn(Operator) -> bool,
    coerce: fn(&str) -> Result<FilterValue, DropReason>,
) -> Outcome {
    let Shape::Raw(s) = shape else {
        return Err(DropReason::UnsupportedShape);
    };
    let (operator, raw) = match decode_prefixed(s) {
        Some((op, v)) if allowed(op) => (op, v),
        _ => (default_op, s),
    };

    if operator.is_nullary() {
        return Ok(Some(null_check(def, operator)));
    }
    if raw.trim().is_empty() {
        return Err(DropReason::MissingValue);
    }
    let value = coerce(raw)?;
    Ok(Some(ServerTableFilter::new(&def.column_key, operator, value)))
}

/// A single date, or a `from|to` range when the value carries one.
fn date(def: &FilterDefinition, shape: Shape<'_>) -> Outcome {
    match shape {
        Shape::Raw(s) => match decode_prefixed(s) {
            Some((Operator::DateBetween, range)) => {
                let (from, to) = decode_date_range(range);
                date_between(def, from, to)
            }
            None if s.contains(RANGE_SEPARATOR) => {
                let (from, to) = decode_date_range(s);
                date_between(def, from, to)
            }
            _ => scalar(def, Shape::Raw(s), Operator::Equals, Operator::is_choice_op, text),
        },
        Shape::Many(_) => Err(DropReason::UnsupportedShape),
    }
}

fn daterange(def: &FilterDefinition, shape: Shape<'_>) -> Outcome {
    let Shape::Raw(s) = shape else {
        return Err(DropReason::UnsupportedShape);
    };
    match decode_prefixed(s) {
        Some((op, _)) if op.is_nullary() => Ok(Some(null_check(def, op))),
        Some((Operator::DateBetween, range)) => {
            let (from, to) = decode_date_range(range);
            date_between(def, from, to)
        }
        Some((op, _)) => Err(DropReason::UnsupportedOperator(op)),
        None => {
            let (from, to) = decode_date_range(s);
            date_between(def, from, to)
        }
    }
}

fn date_between(def: &FilterDefinition, from: &str, to: &str) -> Outcome {
    let range = DateRange::new(from, to);
    if range.is_unbounded() {
        return Ok(None);
    }
    Ok(Some(ServerTableFilter::new(
        &def.column_key,
        Operator::DateBetween,
        range,
    )))
}

fn multiselect(def: &FilterDefinition, shape: Shape<'_>) -> Outcome {
    let (operator, items) = match shape {
        Shape::Many(items) => (Operator::In, items),
        Shape::Raw(s) => match decode_prefixed(s) {
            Some((op, _)) if op.is_nullary() => return Ok(Some(null_check(def, op))),
            Some((op, v)) if op.is_set_op() => {
                if v.trim().is_empty() {
                    return Err(DropReason::MissingValue);
                }
                (op, vec![v])
            }
            _ => (Operator::In, vec![s]),
        },
    };
    if items.is_empty() {
        return Ok(None);
    }
    let list: Vec<String> = items.into_iter().map(str::to_string).collect();
    Ok(Some(ServerTableFilter::new(
        &def.column_key,
        operator,
        FilterValue::List(list),
    )))
}

fn null_check(def: &FilterDefinition, operator: Operator) -> ServerTableFilter {
    ServerTableFilter::new(&def.column_key, operator, FilterValue::Null)
}

fn text(raw: &str) -> Result<FilterValue, DropReason> {
    Ok(FilterValue::Text(raw.to_string()))
}

fn number(raw: &str) -> Result<FilterValue, DropReason> {
    Number::parse(raw)
        .map(FilterValue::Number)
        .ok_or_else(|| DropReason::InvalidNumber(raw.to_string()))
}

fn boolean(raw: &str) -> Result<FilterValue, DropReason> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(FilterValue::Bool(true)),
        "false" | "0" | "no" => Ok(FilterValue::Bool(false)),
        _ => Err(DropReason::InvalidBoolean(raw.to_string())),
    }
}
