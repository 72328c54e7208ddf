//! Tablekit filters - registry, normalization and merging for server-driven tables.
//!
//! This crate holds the filter side of a server-driven data table:
//!
//! - A [`FilterRegistry`]: per-table, ordered [`FilterDefinition`]s, built once
//!   and shared read-only
//! - Quick filter values ([`QuickFilterValues`]) as entered in a table toolbar
//! - [`normalize`]: quick filter values → [`ServerTableFilter`] clauses
//! - [`merge`]: view filters + quick filters → one [`MergedFilterSet`]
//!
//! # Quick Start
//!
//! ```rust
//! use tablekit_filters::{
//!     merge, normalize, FilterDefinition, FilterMode, FilterRegistry, FilterType,
//!     QuickFilterValues, ServerTableFilter,
//! };
//!
//! let registry = FilterRegistry::builder()
//!     .filter("projects", FilterDefinition::new("status", "Status", FilterType::Select))
//!     .filter("projects", FilterDefinition::new("created", "Created", FilterType::Daterange))
//!     .build()
//!     .unwrap();
//!
//! let quick = normalize(
//!     &registry,
//!     "projects",
//!     &QuickFilterValues::new()
//!         .with("status", "active")
//!         .with("created", "2024-01-01|"),
//! );
//!
//! let view = vec![ServerTableFilter::equals("owner", "bob")];
//! let merged = merge(&view, FilterMode::All, &quick);
//!
//! assert_eq!(merged.filters.len(), 3);
//! assert_eq!(merged.filters[0].field, "owner");
//! ```
//!
//! # Failure Policy
//!
//! Normalization and merging are total. A value for an unknown column, or one
//! that doesn't coerce to its column's type, is dropped rather than reported
//! as an error; [`normalize_with_diagnostics`] lists the drops for callers
//! that want to surface them. Only loading a registry from text or a file
//! can fail.

mod clause;
mod definition;
mod error;
mod merge;
mod normalize;
mod op;
mod quick;
mod registry;
mod value;

// Re-export public API
pub use clause::{order_view_filters, ServerTableFilter, ViewFilter};
pub use definition::{FilterDefinition, FilterOption, FilterType, OptionSource};
pub use error::{FilterError, Result};
pub use merge::{merge, FilterMode, MergedFilterSet};
pub use normalize::{normalize, normalize_with_diagnostics, DropReason, DroppedFilter, Normalized};
pub use op::Operator;
pub use quick::{
    decode_date_range, decode_prefixed, encode_date_range, encode_prefixed, QuickFilterValue,
    QuickFilterValues, PREFIX_SEPARATOR, RANGE_SEPARATOR,
};
pub use registry::{FilterRegistry, FilterRegistryBuilder, REGISTRY_EXTENSIONS};
pub use value::{DateRange, FilterValue, Number};
