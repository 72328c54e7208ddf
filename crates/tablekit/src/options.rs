//! Construction options for a [`TableQuery`](crate::TableQuery).
//!
//! Options are plain data. Build them in code with the `with_*` methods, or
//! deserialize them (camelCase keys, every field but `tableId` optional):
//!
//! ```yaml
//! tableId: projects
//! pageSize: 50
//! initialSort: { sortBy: name, sortOrder: asc }
//! sortWhitelist: [name, status]
//! ```

use serde::{Deserialize, Serialize};

use tablekit_filters::FilterMode;

use crate::error::Result;
use crate::sorting::SortSpec;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Initial state and constraints of one table's query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQueryOptions {
    /// Registry key of the table.
    pub table_id: String,
    /// First page shown (1-based).
    #[serde(default = "default_page")]
    pub initial_page: u32,
    /// Search text shown initially.
    #[serde(default)]
    pub initial_search: String,
    /// Sort used initially and restored when sorting is cleared.
    #[serde(default)]
    pub initial_sort: SortSpec,
    /// Filter mode used when no view sets one.
    #[serde(default)]
    pub initial_view_filter_mode: FilterMode,
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Columns the backend can sort on. `None` allows any column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_whitelist: Option<Vec<String>>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TableQueryOptions {
    /// Creates default options for a table.
    pub fn new(table_id: impl Into<String>) -> Self {
        TableQueryOptions {
            table_id: table_id.into(),
            initial_page: default_page(),
            initial_search: String::new(),
            initial_sort: SortSpec::default(),
            initial_view_filter_mode: FilterMode::default(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_whitelist: None,
        }
    }

    /// Parses options from YAML (JSON is valid YAML too).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    pub fn with_initial_search(mut self, search: impl Into<String>) -> Self {
        self.initial_search = search.into();
        self
    }

    pub fn with_initial_sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = sort;
        self
    }

    pub fn with_initial_view_filter_mode(mut self, mode: FilterMode) -> Self {
        self.initial_view_filter_mode = mode;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Restricts user sorting to the given columns.
    pub fn with_sort_whitelist<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_whitelist = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if user sorting on `column` is allowed.
    pub fn allows_sort(&self, column: &str) -> bool {
        match &self.sort_whitelist {
            Some(list) => list.iter().any(|c| c == column),
            None => true,
        }
    }
}
