//! Tablekit - query state for server-driven data tables.
//!
//! A server-driven table keeps its rows on the server and asks for one page
//! at a time. This crate holds the client side of that conversation:
//!
//! - [`TableQuery`]: page, page size, search, sort and the two filter
//!   sources (saved view + quick filters), updated by UI events
//! - [`Query`]: the snapshot sent to the fetch layer, as JSON or as
//!   query-string pairs
//! - [`TableView`]: a saved view, applied with [`TableQuery::apply_view`]
//! - [`ViewSelectionCache`]: which saved view each table has selected
//!
//! The filter registry, normalizer and merger live in `tablekit-filters` and
//! are re-exported here.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tablekit::{
//!     FilterDefinition, FilterRegistry, FilterType, QuickFilterValues, ServerTableFilter,
//!     SortingEntry, TableQuery, TableQueryOptions,
//! };
//!
//! let registry = Arc::new(
//!     FilterRegistry::builder()
//!         .filter("projects", FilterDefinition::new("status", "Status", FilterType::Select))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let options = TableQueryOptions::new("projects").with_sort_whitelist(["name", "status"]);
//! let mut table = TableQuery::new(registry, options);
//!
//! table.on_view_filters_change(vec![ServerTableFilter::equals("owner", "bob")]);
//! table.on_global_filters_change(QuickFilterValues::new().with("status", "active"));
//! table.on_sorting_change(&[SortingEntry::new("name", true)]);
//!
//! let query = table.query();
//! assert_eq!(query.filters[0].field, "owner");
//! assert_eq!(query.filters[1].field, "status");
//! assert_eq!(query.sort_by, "name");
//! ```

mod cache;
mod error;
mod options;
mod query;
mod sorting;
mod state;
mod view;

// Re-export public API
pub use cache::{MemoryBackend, SelectionBackend, ViewSelection, ViewSelectionCache, ALL_ITEMS_KEY};
pub use error::{Result, TableError};
pub use options::{TableQueryOptions, DEFAULT_PAGE_SIZE};
pub use query::Query;
pub use sorting::{SortOrder, SortSpec, SortingEntry, DEFAULT_SORT_FIELD};
pub use state::{TableEvent, TableQuery, TableQueryState};
pub use view::{TableView, ViewMetadata};

// Re-export the filters crate
pub use tablekit_filters::{
    decode_date_range, encode_date_range, merge, normalize, normalize_with_diagnostics,
    DateRange, DropReason, DroppedFilter, FilterDefinition, FilterError, FilterMode, FilterOption,
    FilterRegistry, FilterType, FilterValue, MergedFilterSet, Normalized, Number, Operator,
    OptionSource, QuickFilterValue, QuickFilterValues, ServerTableFilter, ViewFilter,
};
