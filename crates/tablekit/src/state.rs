//! The table query state machine.
//!
//! [`TableQuery`] owns everything a server-driven table needs to build its
//! fetch query: page, page size, search text, sort, the active view's
//! filters and mode, and the toolbar's quick filter values.
//!
//! # Page reset
//!
//! Every `on_*` handler except [`TableQuery::on_page_change`] sends the table
//! back to page 1, since the old page number means nothing once the result
//! set changes. A handler that ignores its input (an invalid filter mode, a
//! sort column outside the whitelist, a zero page size) leaves the page
//! alone too.
//!
//! The `set_*` methods are the primitive setters underneath the handlers and
//! never touch the page.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tablekit::{
//!     FilterDefinition, FilterRegistry, FilterType, QuickFilterValues, TableQuery,
//!     TableQueryOptions,
//! };
//!
//! let registry = FilterRegistry::builder()
//!     .filter("projects", FilterDefinition::new("status", "Status", FilterType::Select))
//!     .build()
//!     .unwrap();
//!
//! let mut table = TableQuery::new(Arc::new(registry), TableQueryOptions::new("projects"));
//! table.on_page_change(3);
//! table.on_global_filters_change(QuickFilterValues::new().with("status", "active"));
//!
//! let query = table.query();
//! assert_eq!(query.page, 1);
//! assert_eq!(query.filters.len(), 1);
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use tablekit_filters::{
    merge, normalize_with_diagnostics, DroppedFilter, FilterMode, FilterRegistry,
    MergedFilterSet, Normalized, QuickFilterValues, ServerTableFilter,
};

use crate::options::{TableQueryOptions, DEFAULT_PAGE_SIZE};
use crate::query::Query;
use crate::sorting::{SortSpec, SortingEntry};
use crate::view::TableView;

/// Everything that determines a table's query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQueryState {
    /// Current page, 1-based.
    pub page: u32,
    /// Rows per page, never zero.
    pub page_size: u32,
    /// Free-text search, sent as-is.
    pub search: String,
    /// Active sort; one column at a time.
    pub sort: SortSpec,
    /// Filters of the applied saved view, in view order.
    pub view_filters: Vec<ServerTableFilter>,
    /// How the view filters combine; quick filters inherit it.
    pub view_filter_mode: FilterMode,
    /// Raw quick filter values as entered, before normalization.
    pub quick_filter_values: QuickFilterValues,
}

impl TableQueryState {
    /// Builds the initial state from options.
    ///
    /// A zero page is raised to 1 and a zero page size falls back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn initial(options: &TableQueryOptions) -> Self {
        TableQueryState {
            page: options.initial_page.max(1),
            page_size: if options.page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                options.page_size
            },
            search: options.initial_search.clone(),
            sort: options.initial_sort.clone(),
            view_filters: Vec::new(),
            view_filter_mode: options.initial_view_filter_mode,
            quick_filter_values: QuickFilterValues::new(),
        }
    }
}

/// A UI event, as delivered by a table component.
///
/// [`TableQuery::handle`] dispatches each variant to its `on_*` handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TableEvent {
    PageChange(u32),
    PageSizeChange(u32),
    SearchChange(String),
    GlobalFiltersChange(QuickFilterValues),
    ViewFiltersChange(Vec<ServerTableFilter>),
    ViewFilterModeChange(String),
    SortingChange(Vec<SortingEntry>),
    ViewSortingChange(Vec<SortingEntry>),
}

/// Query state of one table, driven by UI events.
///
/// Owned by a single table view; all transitions take `&mut self`. The
/// registry is shared.
#[derive(Debug, Clone)]
pub struct TableQuery {
    registry: Arc<FilterRegistry>,
    options: TableQueryOptions,
    state: TableQueryState,
    quick: Normalized,
}

impl TableQuery {
    /// Creates the state machine in its initial state.
    pub fn new(registry: Arc<FilterRegistry>, options: TableQueryOptions) -> Self {
        let state = TableQueryState::initial(&options);
        TableQuery {
            registry,
            options,
            state,
            quick: Normalized::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the table id these options were created for.
    pub fn table_id(&self) -> &str {
        &self.options.table_id
    }

    /// Returns the options this table was created with.
    pub fn options(&self) -> &TableQueryOptions {
        &self.options
    }

    /// Returns the current state.
    pub fn state(&self) -> &TableQueryState {
        &self.state
    }

    /// Returns the normalized quick filters.
    pub fn quick_filters(&self) -> &[ServerTableFilter] {
        &self.quick.filters
    }

    /// Returns quick filter values that were dropped during normalization.
    pub fn quick_filter_diagnostics(&self) -> &[DroppedFilter] {
        &self.quick.dropped
    }

    /// Returns view filters followed by quick filters, in the view's mode.
    pub fn merged_filters(&self) -> MergedFilterSet {
        merge(
            &self.state.view_filters,
            self.state.view_filter_mode,
            &self.quick.filters,
        )
    }

    /// Derives the fetch query from the current state.
    pub fn query(&self) -> Query {
        let merged = self.merged_filters();
        Query {
            page: self.state.page,
            page_size: self.state.page_size,
            search: self.state.search.clone(),
            filters: merged.filters,
            filter_mode: merged.filter_mode,
            sort_by: self.state.sort.sort_by.clone(),
            sort_order: self.state.sort.sort_order,
        }
    }

    // ========================================================================
    // Primitive setters (no page reset)
    // ========================================================================

    /// Sets the page, raising 0 to 1.
    pub fn set_page(&mut self, page: u32) {
        self.state.page = page.max(1);
    }

    /// Sets the page size. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: u32) {
        if page_size > 0 {
            self.state.page_size = page_size;
        }
    }

    /// Sets the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    /// Sets the sort as given, skipping the whitelist.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.state.sort = sort;
    }

    /// Replaces the view filters.
    pub fn set_view_filters(&mut self, filters: Vec<ServerTableFilter>) {
        self.state.view_filters = filters;
    }

    /// Sets the view filter mode.
    pub fn set_view_filter_mode(&mut self, mode: FilterMode) {
        self.state.view_filter_mode = mode;
    }

    /// Replaces the quick filter values and renormalizes them.
    pub fn set_quick_filter_values(&mut self, values: QuickFilterValues) {
        self.quick = normalize_with_diagnostics(&self.registry, &self.options.table_id, &values);
        self.state.quick_filter_values = values;
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Moves to a page. Does not reset anything.
    pub fn on_page_change(&mut self, page: u32) {
        self.set_page(page);
        trace!(table_id = %self.options.table_id, page = self.state.page, "Page changed");
    }

    /// Changes the page size and returns to page 1. Zero is ignored,
    /// page included.
    pub fn on_page_size_change(&mut self, page_size: u32) {
        if page_size == 0 {
            debug!(table_id = %self.options.table_id, "Ignored zero page size");
            return;
        }
        self.set_page_size(page_size);
        self.reset_page("page size");
    }

    /// Changes the search text and returns to page 1.
    pub fn on_search_change(&mut self, search: impl Into<String>) {
        self.set_search(search);
        self.reset_page("search");
    }

    /// Replaces the quick filter values and returns to page 1.
    pub fn on_global_filters_change(&mut self, values: QuickFilterValues) {
        self.set_quick_filter_values(values);
        self.reset_page("quick filters");
    }

    /// Replaces the view filters and returns to page 1.
    pub fn on_view_filters_change(&mut self, filters: Vec<ServerTableFilter>) {
        self.set_view_filters(filters);
        self.reset_page("view filters");
    }

    /// Sets the view filter mode from its wire name.
    ///
    /// Anything other than `all` or `any` is ignored, page included.
    pub fn on_view_filter_mode_change(&mut self, mode: &str) {
        let Some(mode) = FilterMode::parse(mode) else {
            debug!(table_id = %self.options.table_id, mode, "Ignored invalid filter mode");
            return;
        };
        self.set_view_filter_mode(mode);
        self.reset_page("view filter mode");
    }

    /// Applies a user sort change.
    ///
    /// Only the first entry counts. A column outside the sort whitelist is
    /// ignored entirely; an empty list restores the initial sort.
    pub fn on_sorting_change(&mut self, sorting: &[SortingEntry]) {
        if let Some(entry) = sorting.first() {
            if !self.options.allows_sort(&entry.id) {
                debug!(
                    table_id = %self.options.table_id,
                    column = %entry.id,
                    "Ignored sort on column outside whitelist"
                );
                return;
            }
        }
        self.apply_sorting(sorting);
    }

    /// Applies a sort coming from a saved view. Bypasses the whitelist.
    pub fn on_view_sorting_change(&mut self, sorting: &[SortingEntry]) {
        self.apply_sorting(sorting);
    }

    /// Applies a loaded saved view.
    ///
    /// Replaces the view filters, then sets the view's filter mode and its
    /// sorting. A missing or unrecognized mode falls back to the initial
    /// mode; missing sorting falls back to the initial sort.
    pub fn apply_view(&mut self, view: &TableView) {
        trace!(table_id = %self.options.table_id, view_id = %view.id, "Applying view");
        self.on_view_filters_change(view.server_filters());
        let mode = view.filter_mode().unwrap_or_else(|| {
            if let Some(raw) = &view.metadata.filter_mode {
                debug!(table_id = %self.options.table_id, mode = %raw, "Ignored invalid view filter mode");
            }
            self.options.initial_view_filter_mode
        });
        self.set_view_filter_mode(mode);
        self.on_view_sorting_change(view.sorting.as_deref().unwrap_or(&[]));
    }

    /// Returns to All Items: no view filters, initial mode and sort.
    pub fn clear_view(&mut self) {
        self.on_view_filters_change(Vec::new());
        self.set_view_filter_mode(self.options.initial_view_filter_mode);
        self.on_view_sorting_change(&[]);
    }

    /// Dispatches a UI event to its handler.
    pub fn handle(&mut self, event: TableEvent) {
        match event {
            TableEvent::PageChange(page) => self.on_page_change(page),
            TableEvent::PageSizeChange(size) => self.on_page_size_change(size),
            TableEvent::SearchChange(search) => self.on_search_change(search),
            TableEvent::GlobalFiltersChange(values) => self.on_global_filters_change(values),
            TableEvent::ViewFiltersChange(filters) => self.on_view_filters_change(filters),
            TableEvent::ViewFilterModeChange(mode) => self.on_view_filter_mode_change(&mode),
            TableEvent::SortingChange(sorting) => self.on_sorting_change(&sorting),
            TableEvent::ViewSortingChange(sorting) => self.on_view_sorting_change(&sorting),
        }
    }

    fn apply_sorting(&mut self, sorting: &[SortingEntry]) {
        let sort = SortSpec::from_entries(sorting).unwrap_or_else(|| self.options.initial_sort.clone());
        self.set_sort(sort);
        self.reset_page("sorting");
    }

    fn reset_page(&mut self, cause: &'static str) {
        self.state.page = 1;
        trace!(table_id = %self.options.table_id, cause, "Reset to first page");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekit_filters::{FilterDefinition, FilterType, Operator, ViewFilter};

    use crate::sorting::SortOrder;

    fn registry() -> Arc<FilterRegistry> {
        Arc::new(
            FilterRegistry::builder()
                .filter("projects", FilterDefinition::new("status", "Status", FilterType::Select))
                .filter("projects", FilterDefinition::new("budget", "Budget", FilterType::Number))
                .build()
                .unwrap(),
        )
    }

    fn table() -> TableQuery {
        TableQuery::new(registry(), TableQueryOptions::new("projects"))
    }

    fn on_page(n: u32) -> TableQuery {
        let mut t = table();
        t.on_page_change(n);
        t
    }

    #[test]
    fn initial_state_from_defaults() {
        let t = table();
        let state = t.state();
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 25);
        assert_eq!(state.search, "");
        assert_eq!(state.sort, SortSpec::desc("createdOnTimestamp"));
        assert_eq!(state.view_filter_mode, FilterMode::All);
        assert!(t.quick_filters().is_empty());
    }

    #[test]
    fn initial_state_sanitizes_zeroes() {
        let t = TableQuery::new(
            registry(),
            TableQueryOptions::new("projects")
                .with_initial_page(0)
                .with_page_size(0),
        );
        assert_eq!(t.state().page, 1);
        assert_eq!(t.state().page_size, 25);
    }

    #[test]
    fn page_change_does_not_reset() {
        let mut t = on_page(3);
        assert_eq!(t.state().page, 3);
        t.on_page_change(0);
        assert_eq!(t.state().page, 1);
    }

    #[test]
    fn page_size_change_resets() {
        let mut t = on_page(4);
        t.on_page_size_change(50);
        assert_eq!(t.state().page, 1);
        assert_eq!(t.state().page_size, 50);
    }

    #[test]
    fn zero_page_size_is_ignored() {
        let mut t = on_page(4);
        t.on_page_size_change(0);
        assert_eq!(t.state().page, 4);
        assert_eq!(t.state().page_size, 25);
    }

    #[test]
    fn search_change_resets() {
        let mut t = on_page(2);
        t.on_search_change("acme");
        assert_eq!(t.state().page, 1);
        assert_eq!(t.state().search, "acme");
    }

    #[test]
    fn invalid_filter_mode_is_ignored() {
        let mut t = on_page(5);
        t.on_view_filter_mode_change("xor");
        assert_eq!(t.state().page, 5);
        assert_eq!(t.state().view_filter_mode, FilterMode::All);

        t.on_view_filter_mode_change("any");
        assert_eq!(t.state().page, 1);
        assert_eq!(t.state().view_filter_mode, FilterMode::Any);
    }

    #[test]
    fn global_filters_normalize() {
        let mut t = on_page(2);
        t.on_global_filters_change(
            QuickFilterValues::new()
                .with("status", "active")
                .with("budget", "lots")
                .with("ghost", "x"),
        );
        assert_eq!(t.state().page, 1);
        assert_eq!(t.quick_filters(), &[ServerTableFilter::equals("status", "active")]);
        assert_eq!(t.quick_filter_diagnostics().len(), 2);
    }

    #[test]
    fn sorting_takes_first_entry() {
        let mut t = on_page(2);
        t.on_sorting_change(&[SortingEntry::new("name", false), SortingEntry::new("x", true)]);
        assert_eq!(t.state().sort, SortSpec::asc("name"));
        assert_eq!(t.state().page, 1);
    }

    #[test]
    fn empty_sorting_restores_initial() {
        let mut t = table();
        t.on_sorting_change(&[SortingEntry::new("name", false)]);
        t.on_page_change(3);
        t.on_sorting_change(&[]);
        assert_eq!(t.state().sort, SortSpec::default());
        assert_eq!(t.state().page, 1);
    }

    #[test]
    fn view_sorting_bypasses_whitelist() {
        let mut t = TableQuery::new(
            registry(),
            TableQueryOptions::new("projects").with_sort_whitelist(["name"]),
        );
        t.on_page_change(2);
        t.on_view_sorting_change(&[SortingEntry::new("secret", true)]);
        assert_eq!(t.state().sort, SortSpec::desc("secret"));
        assert_eq!(t.state().page, 1);
    }

    #[test]
    fn setters_do_not_reset() {
        let mut t = on_page(7);
        t.set_search("x");
        t.set_page_size(10);
        t.set_page_size(0);
        t.set_sort(SortSpec::asc("name"));
        t.set_view_filters(vec![ServerTableFilter::equals("owner", "bob")]);
        t.set_view_filter_mode(FilterMode::Any);
        t.set_quick_filter_values(QuickFilterValues::new().with("status", "paused"));
        assert_eq!(t.state().page, 7);
        assert_eq!(t.state().page_size, 10);
        assert_eq!(t.quick_filters().len(), 1);
    }

    #[test]
    fn apply_view_sets_filters_mode_and_sort() {
        let mut t = on_page(3);
        let view = TableView::new("v", "Mine")
            .with_filter(ViewFilter::new("owner", Operator::Equals, "bob").with_sort_order(2))
            .with_filter(ViewFilter::new("status", Operator::NotEquals, "archived").with_sort_order(1))
            .with_filter_mode(FilterMode::Any)
            .with_sorting(vec![SortingEntry::new("name", true)]);
        t.apply_view(&view);

        let state = t.state();
        assert_eq!(state.page, 1);
        assert_eq!(state.view_filters[0].field, "status");
        assert_eq!(state.view_filters[1].field, "owner");
        assert_eq!(state.view_filter_mode, FilterMode::Any);
        assert_eq!(state.sort, SortSpec::desc("name"));
    }

    #[test]
    fn apply_view_without_mode_or_sort_uses_initial() {
        let mut t = table();
        t.on_view_filter_mode_change("any");
        t.on_sorting_change(&[SortingEntry::new("name", false)]);
        t.apply_view(&TableView::new("v", "Bare"));
        assert_eq!(t.state().view_filter_mode, FilterMode::All);
        assert_eq!(t.state().sort, SortSpec::default());
    }

    #[test]
    fn apply_view_with_invalid_mode_uses_initial() {
        let mut t = table();
        t.apply_view(&TableView::new("a", "Either").with_filter_mode(FilterMode::Any));
        assert_eq!(t.state().view_filter_mode, FilterMode::Any);

        let mut other = TableView::new("b", "Shouting");
        other.metadata.filter_mode = Some("OR".to_string());
        t.apply_view(&other);
        assert_eq!(t.state().view_filter_mode, FilterMode::All);
    }

    #[test]
    fn clear_view_returns_to_all_items() {
        let mut t = table();
        t.apply_view(
            &TableView::new("v", "Mine")
                .with_filter(ViewFilter::new("owner", Operator::Equals, "bob"))
                .with_filter_mode(FilterMode::Any),
        );
        t.on_global_filters_change(QuickFilterValues::new().with("status", "active"));
        t.on_page_change(4);
        t.clear_view();

        assert!(t.state().view_filters.is_empty());
        assert_eq!(t.state().view_filter_mode, FilterMode::All);
        assert_eq!(t.state().page, 1);
        assert_eq!(t.quick_filters().len(), 1);
    }

    #[test]
    fn handle_dispatches() {
        let mut t = table();
        t.handle(TableEvent::PageChange(3));
        assert_eq!(t.state().page, 3);
        t.handle(TableEvent::SortingChange(vec![SortingEntry::new("name", true)]));
        assert_eq!(t.state().page, 1);
        assert_eq!(t.state().sort.sort_order, SortOrder::Desc);
        t.handle(TableEvent::ViewFilterModeChange("any".into()));
        assert_eq!(t.state().view_filter_mode, FilterMode::Any);
    }

    #[test]
    fn events_decode_from_json() {
        let event: TableEvent =
            serde_json::from_str(r#"{"type": "globalFiltersChange", "payload": {"status": "active"}}"#)
                .unwrap();
        assert_eq!(
            event,
            TableEvent::GlobalFiltersChange(QuickFilterValues::new().with("status", "active"))
        );
        let event: TableEvent = serde_json::from_str(r#"{"type": "pageChange", "payload": 2}"#).unwrap();
        assert_eq!(event, TableEvent::PageChange(2));
    }

    #[test]
    fn query_reflects_state() {
        let mut t = table();
        t.on_view_filters_change(vec![ServerTableFilter::equals("owner", "bob")]);
        t.on_global_filters_change(QuickFilterValues::new().with("status", "active"));
        t.on_search_change("acme");
        let query = t.query();
        assert_eq!(query.search, "acme");
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].field, "owner");
        assert_eq!(query.sort_by, "createdOnTimestamp");
        assert_eq!(query.sort_order, SortOrder::Desc);
    }
}
