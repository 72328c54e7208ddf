//! Filter operators understood by the server.
//!
//! The [`Operator`] enum lists every operator a [`ServerTableFilter`] can
//! carry. Not every operator is valid for every filter type; the helpers
//! below say which ones a quick filter may request through the
//! `"operator:value"` prefix form.
//!
//! [`ServerTableFilter`]: crate::ServerTableFilter

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Comparison operator for a server filter clause.
///
/// Operators are grouped by the values they take:
/// - **Universal**: `Equals`, `NotEquals`
/// - **Text**: `Contains`, `NotContains`, `StartsWith`, `EndsWith`
/// - **Numeric**: `Gt`, `Gte`, `Lt`, `Lte`
/// - **Set**: `In`, `NotIn`
/// - **Range**: `DateBetween`
/// - **Nullary**: `IsNull`, `IsNotNull` (no value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    // Universal operators
    /// Exact match.
    Equals,
    /// Not equal.
    NotEquals,

    // Text operators
    /// Substring match.
    Contains,
    /// Negated substring match.
    NotContains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,

    // Numeric operators
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,

    // Set operators
    /// Value is one of the given list.
    In,
    /// Value is none of the given list.
    NotIn,

    // Range operators
    /// Date falls within `{from, to}`; either bound may be open.
    DateBetween,

    // Nullary operators
    /// Field has no value.
    IsNull,
    /// Field has a value.
    IsNotNull,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::DateBetween,
        Operator::IsNull,
        Operator::IsNotNull,
    ];

    /// Returns `true` if this operator is valid for free-text columns.
    pub fn is_text_op(self) -> bool {
        matches!(
            self,
            Operator::Equals
                | Operator::NotEquals
                | Operator::Contains
                | Operator::NotContains
                | Operator::StartsWith
                | Operator::EndsWith
        ) || self.is_nullary()
    }

    /// Returns `true` if this operator is valid for numeric columns.
    pub fn is_number_op(self) -> bool {
        matches!(
            self,
            Operator::Equals
                | Operator::NotEquals
                | Operator::Gt
                | Operator::Gte
                | Operator::Lt
                | Operator::Lte
        ) || self.is_nullary()
    }

    /// Returns `true` if this operator is valid for single-choice columns
    /// (`select`, `autocomplete`, `date`).
    pub fn is_choice_op(self) -> bool {
        matches!(self, Operator::Equals | Operator::NotEquals) || self.is_nullary()
    }

    /// Returns `true` if this operator is valid for list values.
    pub fn is_set_op(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns `true` if this operator carries no value.
    pub fn is_nullary(self) -> bool {
        matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::DateBetween => "dateBetween",
            Operator::IsNull => "isNull",
            Operator::IsNotNull => "isNotNull",
        }
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
