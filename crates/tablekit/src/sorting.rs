//! Sort direction and single-column sort specs.
//!
//! Tables report sorting as a list of [`SortingEntry`] (`{id, desc}`), the
//! shape a table component emits. The query only supports one column, so
//! [`SortSpec::from_entries`] keeps the first entry.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Column sorted on when nothing else is configured.
pub const DEFAULT_SORT_FIELD: &str = "createdOnTimestamp";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortOrder {
    /// Returns `Desc` if `desc` is true, `Asc` otherwise.
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, SortOrder::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, SortOrder::Desc)
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(TableError::InvalidSortOrder(s.to_string()))
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The column and direction a query is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    /// The column to sort by.
    pub sort_by: String,
    /// The sort direction.
    pub sort_order: SortOrder,
}

impl SortSpec {
    /// Creates a sort spec with the given direction.
    pub fn new(sort_by: impl Into<String>, sort_order: SortOrder) -> Self {
        SortSpec {
            sort_by: sort_by.into(),
            sort_order,
        }
    }

    /// Creates an ascending sort spec.
    pub fn asc(sort_by: impl Into<String>) -> Self {
        Self::new(sort_by, SortOrder::Asc)
    }

    /// Creates a descending sort spec.
    pub fn desc(sort_by: impl Into<String>) -> Self {
        Self::new(sort_by, SortOrder::Desc)
    }

    /// Takes the first entry of a table's sorting list.
    ///
    /// Returns `None` for an empty list.
    pub fn from_entries(entries: &[SortingEntry]) -> Option<SortSpec> {
        entries.first().map(SortingEntry::to_spec)
    }
}

impl Default for SortSpec {
    /// Newest first, by creation time.
    fn default() -> Self {
        SortSpec::desc(DEFAULT_SORT_FIELD)
    }
}

impl FromStr for SortSpec {
    type Err = TableError;

    /// Parses `field` or `field:asc|desc`. A bare field sorts ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((field, order)) => Ok(SortSpec::new(field.trim(), order.parse()?)),
            None => Ok(SortSpec::asc(s.trim())),
        }
    }
}

/// One entry of a table component's sorting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingEntry {
    /// Column id.
    pub id: String,
    /// Whether the column sorts descending.
    #[serde(default)]
    pub desc: bool,
}

impl SortingEntry {
    /// Creates a sorting entry.
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        SortingEntry { id: id.into(), desc }
    }

    /// Converts this entry into a sort spec.
    pub fn to_spec(&self) -> SortSpec {
        SortSpec::new(&self.id, SortOrder::from_desc(self.desc))
    }
}

impl From<&SortSpec> for SortingEntry {
    fn from(spec: &SortSpec) -> Self {
        SortingEntry::new(&spec.sort_by, spec.sort_order.is_desc())
    }
}
