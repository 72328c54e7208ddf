//! Saved views as delivered by the view-persistence service.
//!
//! A [`TableView`] is consumed, never stored, by this crate. Applying one to
//! a table goes through [`TableQuery::apply_view`](crate::TableQuery::apply_view).

use serde::{Deserialize, Serialize};

use tablekit_filters::{order_view_filters, FilterMode, ServerTableFilter, ViewFilter};

use crate::error::Result;
use crate::sorting::SortingEntry;

/// A named, persisted set of filters and sorting for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filters: Vec<ViewFilter>,
    #[serde(default)]
    pub metadata: ViewMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Vec<SortingEntry>>,
}

/// View metadata. Only `filterMode` is interpreted; column visibility,
/// grouping and the like pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_mode: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TableView {
    /// Creates an empty view.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        TableView {
            id: id.into(),
            name: name.into(),
            filters: Vec::new(),
            metadata: ViewMetadata::default(),
            sorting: None,
        }
    }

    /// Decodes one view from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes a list of views from JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_filter(mut self, filter: ViewFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_filter_mode(mut self, mode: FilterMode) -> Self {
        self.metadata.filter_mode = Some(mode.as_str().to_string());
        self
    }

    pub fn with_sorting(mut self, sorting: Vec<SortingEntry>) -> Self {
        self.sorting = Some(sorting);
        self
    }

    /// Returns the view's filters as server clauses, in position order.
    pub fn server_filters(&self) -> Vec<ServerTableFilter> {
        order_view_filters(self.filters.iter().cloned())
    }

    /// Returns the view's filter mode, if set and valid.
    pub fn filter_mode(&self) -> Option<FilterMode> {
        self.metadata.filter_mode.as_deref().and_then(FilterMode::parse)
    }
}
