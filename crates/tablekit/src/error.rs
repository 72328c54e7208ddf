//! Error types for table state and saved views.
//!
//! The state machine itself never fails; invalid transitions are ignored.
//! These errors come from decoding options and views, and encoding queries,
//! at the boundary.

use thiserror::Error;

use tablekit_filters::FilterError;

/// Errors that can occur when loading table options or saved views.
#[derive(Debug, Error)]
pub enum TableError {
    /// Registry or filter value error.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A saved view (or list of views) was not valid JSON.
    #[error("invalid table view: {0}")]
    View(#[from] serde_json::Error),

    /// Query filters could not be encoded for the wire.
    #[error("failed to encode query filters: {0}")]
    Encode(#[source] serde_json::Error),

    /// Table options were not valid YAML.
    #[error("invalid table options: {0}")]
    Options(#[from] serde_yaml::Error),

    /// Sort order was neither `asc` nor `desc`.
    #[error("invalid sort order '{0}' (expected 'asc' or 'desc')")]
    InvalidSortOrder(String),
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
