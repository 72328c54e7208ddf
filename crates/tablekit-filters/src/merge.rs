//! Merging view filters with quick filters.
//!
//! A saved view carries its own filter list and boolean mode. Quick filters
//! are appended after the view's filters and share the view's mode:
//!
//! ```text
//! merged.filters    = view_filters ++ quick_filters
//! merged.filter_mode = view_filter_mode
//! ```
//!
//! With mode [`FilterMode::Any`], a quick filter therefore becomes one more
//! OR'd alternative rather than narrowing the view. That asymmetry is kept
//! as-is; quick filters have no mode of their own.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clause::ServerTableFilter;
use crate::error::FilterError;

/// How a filter list is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every clause must match (AND).
    #[default]
    All,
    /// At least one clause must match (OR).
    Any,
}

impl FilterMode {
    /// Parses a mode leniently, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything other than `all` or `any`.
    pub fn parse(input: &str) -> Option<FilterMode> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Some(FilterMode::All)
        } else if trimmed.eq_ignore_ascii_case("any") {
            Some(FilterMode::Any)
        } else {
            None
        }
    }

    /// Returns the wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Any => "any",
        }
    }
}

impl FromStr for FilterMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterMode::parse(s).ok_or_else(|| FilterError::InvalidFilterMode(s.to_string()))
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A combined filter list ready to send to the server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedFilterSet {
    /// View filters first, then quick filters.
    pub filters: Vec<ServerTableFilter>,
    /// How `filters` are combined.
    pub filter_mode: FilterMode,
}

impl MergedFilterSet {
    /// Returns `true` if there are no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Merges view filters with quick filters.
///
/// Pure: the same inputs always produce the same output. View filter order
/// is preserved verbatim and nothing is deduplicated.
///
/// # Example
///
/// ```
/// use tablekit_filters::{merge, FilterMode, ServerTableFilter};
///
/// let view = vec![ServerTableFilter::equals("owner", "bob")];
/// let quick = vec![ServerTableFilter::equals("status", "active")];
///
/// let merged = merge(&view, FilterMode::All, &quick);
/// assert_eq!(merged.filters[0].field, "owner");
/// assert_eq!(merged.filters[1].field, "status");
/// assert_eq!(merged.filter_mode, FilterMode::All);
/// ```
pub fn merge(
    view_filters: &[ServerTableFilter],
    view_filter_mode: FilterMode,
    quick_filters: &[ServerTableFilter],
) -> MergedFilterSet {
    let mut filters = Vec::with_capacity(view_filters.len() + quick_filters.len());
    filters.extend_from_slice(view_filters);
    filters.extend_from_slice(quick_filters);
    MergedFilterSet {
        filters,
        filter_mode: view_filter_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Operator;

    #[test]
    fn mode_parse_is_lenient() {
        assert_eq!(FilterMode::parse("all"), Some(FilterMode::All));
        assert_eq!(FilterMode::parse(" ANY "), Some(FilterMode::Any));
        assert_eq!(FilterMode::parse("or"), None);
        assert_eq!(FilterMode::parse(""), None);
        assert!("both".parse::<FilterMode>().is_err());
        assert_eq!("Any".parse::<FilterMode>().unwrap(), FilterMode::Any);
    }

    #[test]
    fn mode_defaults_to_all() {
        assert_eq!(FilterMode::default(), FilterMode::All);
        assert_eq!(FilterMode::Any.to_string(), "any");
    }

    #[test]
    fn view_filters_come_first() {
        let view = vec![
            ServerTableFilter::equals("b", "2"),
            ServerTableFilter::equals("a", "1"),
        ];
        let quick = vec![ServerTableFilter::new("c", Operator::Contains, "3")];
        let merged = merge(&view, FilterMode::Any, &quick);
        let fields: Vec<&str> = merged.filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a", "c"]);
        assert_eq!(merged.filter_mode, FilterMode::Any);
    }

    #[test]
    fn no_dedup() {
        let same = ServerTableFilter::equals("status", "active");
        let merged = merge(&[same.clone()], FilterMode::All, &[same]);
        assert_eq!(merged.filters.len(), 2);
    }

    #[test]
    fn empty_view_keeps_mode() {
        let quick = vec![ServerTableFilter::equals("status", "active")];
        let merged = merge(&[], FilterMode::All, &quick);
        assert_eq!(merged.filters, quick);
        assert_eq!(merged.filter_mode, FilterMode::All);

        let merged = merge(&[], FilterMode::Any, &[]);
        assert!(merged.is_empty());
        assert_eq!(merged.filter_mode, FilterMode::Any);
    }
}
