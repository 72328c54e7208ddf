//! Filter clauses sent to the server.
//!
//! A [`ServerTableFilter`] is a single normalized predicate: a field, an
//! operator and a value. A [`ViewFilter`] is the same thing as persisted in a
//! saved view, with an optional position.

use serde::{Deserialize, Serialize};

use crate::op::Operator;
use crate::value::FilterValue;

/// A single normalized filter clause.
///
/// # Example
///
/// ```
/// use tablekit_filters::{Operator, ServerTableFilter};
///
/// let clause = ServerTableFilter::new("status", Operator::Equals, "active");
/// assert_eq!(clause.value.as_text(), Some("active"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTableFilter {
    /// Column key the clause applies to.
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The value to compare against.
    #[serde(default)]
    pub value: FilterValue,
}

impl ServerTableFilter {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        ServerTableFilter {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an `equals` clause.
    pub fn equals(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, Operator::Equals, value)
    }

    /// Creates an `in` clause.
    pub fn one_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = values.into_iter().map(Into::into).collect();
        Self::new(field, Operator::In, FilterValue::List(list))
    }
}

/// A filter as authored and persisted in a saved view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilter {
    /// Column key the clause applies to.
    pub field: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The value to compare against.
    #[serde(default)]
    pub value: FilterValue,
    /// Position within the view's filter list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl ViewFilter {
    /// Creates a view filter without an explicit position.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        ViewFilter {
            field: field.into(),
            operator,
            value: value.into(),
            sort_order: None,
        }
    }

    /// Sets the position of this filter within its view.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }
}

impl From<ViewFilter> for ServerTableFilter {
    fn from(filter: ViewFilter) -> Self {
        ServerTableFilter {
            field: filter.field,
            operator: filter.operator,
            value: filter.value,
        }
    }
}

/// Orders view filters by their `sort_order` and converts them into clauses.
///
/// The sort is stable: filters with equal positions keep their relative
/// order, and filters without a position go last in the order given.
pub fn order_view_filters(filters: impl IntoIterator<Item = ViewFilter>) -> Vec<ServerTableFilter> {
    let mut filters: Vec<ViewFilter> = filters.into_iter().collect();
    filters.sort_by_key(|f| f.sort_order.map_or((1, 0), |pos| (0, pos)));
    filters.into_iter().map(ServerTableFilter::from).collect()
}
